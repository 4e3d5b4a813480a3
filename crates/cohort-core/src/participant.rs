//! Participant records: study environments, identities, profiles and
//! enrollees.
//!
//! An enrollee is a participant's study-scoped record. It links one
//! participant user (the login identity) and, optionally, one profile (the
//! demographic and contact data) to exactly one study environment.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Scope ───────────────────────────────────────────────────────────────────

/// The environment of a study deployment; every search is scoped to one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyEnvironment {
  pub id:         Uuid,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

// ─── Identity ────────────────────────────────────────────────────────────────

/// The authentication identity of a participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantUser {
  pub id:         Uuid,
  pub username:   String,
  pub created_at: DateTime<Utc>,
  pub last_login: Option<DateTime<Utc>>,
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// Demographic and contact attributes. Every descriptive field is optional;
/// participants fill them in over time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
  pub id:            Uuid,
  pub given_name:    Option<String>,
  pub family_name:   Option<String>,
  pub contact_email: Option<String>,
  pub phone_number:  Option<String>,
  pub birth_date:    Option<NaiveDate>,
  pub sex_at_birth:  Option<String>,
  pub do_not_email:  bool,
  pub created_at:    DateTime<Utc>,
}

/// Input for creating a [`Profile`]. The id and timestamp are assigned by the
/// store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewProfile {
  pub given_name:    Option<String>,
  pub family_name:   Option<String>,
  pub contact_email: Option<String>,
  pub phone_number:  Option<String>,
  pub birth_date:    Option<NaiveDate>,
  pub sex_at_birth:  Option<String>,
  pub do_not_email:  bool,
}

impl NewProfile {
  pub fn named(given: impl Into<String>, family: impl Into<String>) -> Self {
    Self {
      given_name: Some(given.into()),
      family_name: Some(family.into()),
      ..Self::default()
    }
  }
}

// ─── Enrollee ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollee {
  pub id:                   Uuid,
  /// Human-readable identifier, unique across all study environments.
  pub shortcode:            String,
  pub study_environment_id: Uuid,
  pub participant_user_id:  Uuid,
  pub profile_id:           Option<Uuid>,
  pub consented:            bool,
  pub created_at:           DateTime<Utc>,
}

/// Input for [`ParticipantStore::enroll`](crate::store::ParticipantStore::enroll).
#[derive(Debug, Clone)]
pub struct NewEnrollee {
  pub study_environment_id: Uuid,
  pub participant_user_id:  Uuid,
  pub profile_id:           Option<Uuid>,
  /// Generated by the store when `None`.
  pub shortcode:            Option<String>,
  pub consented:            bool,
}

impl NewEnrollee {
  pub fn new(study_environment_id: Uuid, participant_user_id: Uuid) -> Self {
    Self {
      study_environment_id,
      participant_user_id,
      profile_id: None,
      shortcode: None,
      consented: false,
    }
  }

  pub fn with_profile(mut self, profile_id: Uuid) -> Self {
    self.profile_id = Some(profile_id);
    self
  }
}
