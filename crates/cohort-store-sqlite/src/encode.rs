//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`),
//! so text order is time order. Dates are `YYYY-MM-DD`. UUIDs are stored as
//! hyphenated lowercase strings. Booleans are `0`/`1` integers.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use cohort_core::{
  kit::KitRequestStatus,
  participant::{Enrollee, ParticipantUser, Profile},
  search::EnrolleeSearchResult,
  task::{TaskStatus, TaskType},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> / NaiveDate ───────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── TaskStatus / TaskType ───────────────────────────────────────────────────

pub fn encode_task_status(s: TaskStatus) -> &'static str {
  match s {
    TaskStatus::New => "NEW",
    TaskStatus::Viewed => "VIEWED",
    TaskStatus::InProgress => "IN_PROGRESS",
    TaskStatus::Complete => "COMPLETE",
    TaskStatus::Rejected => "REJECTED",
  }
}

pub fn encode_task_type(t: TaskType) -> &'static str {
  match t {
    TaskType::Consent => "CONSENT",
    TaskType::Survey => "SURVEY",
    TaskType::KitRequest => "KIT_REQUEST",
  }
}

// ─── KitRequestStatus ────────────────────────────────────────────────────────

pub fn encode_kit_status(s: KitRequestStatus) -> &'static str {
  match s {
    KitRequestStatus::Created => "CREATED",
    KitRequestStatus::Sent => "SENT",
    KitRequestStatus::Received => "RECEIVED",
    KitRequestStatus::Errored => "ERRORED",
  }
}

/// Parse a stored or caller-supplied kit status. Returns `None` for anything
/// outside the enum so callers can pick the error to raise.
pub fn parse_kit_status(s: &str) -> Option<KitRequestStatus> {
  match s {
    "CREATED" => Some(KitRequestStatus::Created),
    "SENT" => Some(KitRequestStatus::Sent),
    "RECEIVED" => Some(KitRequestStatus::Received),
    "ERRORED" => Some(KitRequestStatus::Errored),
    _ => None,
  }
}

pub fn decode_kit_status(s: &str) -> Result<KitRequestStatus> {
  parse_kit_status(s)
    .ok_or_else(|| Error::Decode(format!("unknown kit status: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list read by [`RawSearchRow::from_row`], in order. Aliases: `e`
/// enrollees, `pu` participant users, `p` profiles.
pub const SEARCH_COLUMNS: &str = "\
  e.id, e.shortcode, e.study_environment_id, e.participant_user_id,
  e.profile_id, e.consented, e.created_at,
  pu.id, pu.username, pu.created_at, pu.last_login,
  p.id, p.given_name, p.family_name, p.contact_email, p.phone_number,
  p.birth_date, p.sex_at_birth, p.do_not_email, p.created_at";

/// Raw values read from one row of the composed search statement.
pub struct RawSearchRow {
  // enrollees
  pub enrollee_id:            String,
  pub shortcode:              String,
  pub study_environment_id:   String,
  pub participant_user_id:    String,
  pub profile_id:             Option<String>,
  pub consented:              bool,
  pub enrollee_created_at:    String,
  // participant_users
  pub user_id:                String,
  pub username:               String,
  pub user_created_at:        String,
  pub last_login:             Option<String>,
  // profiles (left join; every column may be NULL)
  pub p_id:                   Option<String>,
  pub given_name:             Option<String>,
  pub family_name:            Option<String>,
  pub contact_email:          Option<String>,
  pub phone_number:           Option<String>,
  pub birth_date:             Option<String>,
  pub sex_at_birth:           Option<String>,
  pub do_not_email:           Option<bool>,
  pub profile_created_at:     Option<String>,
  // derived
  pub most_recent_kit_status: Option<String>,
}

impl RawSearchRow {
  /// Read a row laid out as [`SEARCH_COLUMNS`] followed by the derived
  /// most-recent kit status.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      enrollee_id:            row.get(0)?,
      shortcode:              row.get(1)?,
      study_environment_id:   row.get(2)?,
      participant_user_id:    row.get(3)?,
      profile_id:             row.get(4)?,
      consented:              row.get(5)?,
      enrollee_created_at:    row.get(6)?,
      user_id:                row.get(7)?,
      username:               row.get(8)?,
      user_created_at:        row.get(9)?,
      last_login:             row.get(10)?,
      p_id:                   row.get(11)?,
      given_name:             row.get(12)?,
      family_name:            row.get(13)?,
      contact_email:          row.get(14)?,
      phone_number:           row.get(15)?,
      birth_date:             row.get(16)?,
      sex_at_birth:           row.get(17)?,
      do_not_email:           row.get(18)?,
      profile_created_at:     row.get(19)?,
      most_recent_kit_status: row.get(20)?,
    })
  }

  pub fn into_result(self) -> Result<EnrolleeSearchResult> {
    let enrollee = Enrollee {
      id:                   decode_uuid(&self.enrollee_id)?,
      shortcode:            self.shortcode,
      study_environment_id: decode_uuid(&self.study_environment_id)?,
      participant_user_id:  decode_uuid(&self.participant_user_id)?,
      profile_id:           self.profile_id.as_deref().map(decode_uuid).transpose()?,
      consented:            self.consented,
      created_at:           decode_dt(&self.enrollee_created_at)?,
    };

    let participant_user = ParticipantUser {
      id:         decode_uuid(&self.user_id)?,
      username:   self.username,
      created_at: decode_dt(&self.user_created_at)?,
      last_login: self.last_login.as_deref().map(decode_dt).transpose()?,
    };

    let profile = match (self.p_id, self.profile_created_at) {
      (Some(id), Some(created_at)) => Some(Profile {
        id:            decode_uuid(&id)?,
        given_name:    self.given_name,
        family_name:   self.family_name,
        contact_email: self.contact_email,
        phone_number:  self.phone_number,
        birth_date:    self.birth_date.as_deref().map(decode_date).transpose()?,
        sex_at_birth:  self.sex_at_birth,
        do_not_email:  self.do_not_email.unwrap_or(false),
        created_at:    decode_dt(&created_at)?,
      }),
      _ => None,
    };

    let most_recent_kit_status = self
      .most_recent_kit_status
      .as_deref()
      .map(decode_kit_status)
      .transpose()?;

    Ok(EnrolleeSearchResult {
      enrollee,
      participant_user,
      profile,
      most_recent_kit_status,
    })
  }
}
