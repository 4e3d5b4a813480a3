//! [`SqliteStore`], the SQLite implementation of [`ParticipantStore`].

use std::{path::Path, sync::Arc};

use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore as _};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use cohort_core::{
  facet::Facet,
  kit::{KitRequest, NewKitRequest},
  participant::{
    Enrollee, NewEnrollee, NewProfile, ParticipantUser, Profile,
    StudyEnvironment,
  },
  search::EnrolleeSearchResult,
  store::ParticipantStore,
  task::{NewParticipantTask, ParticipantTask},
};

use crate::{
  Error, Result,
  encode::{
    RawSearchRow, encode_date, encode_dt, encode_kit_status, encode_task_status,
    encode_task_type, encode_uuid,
  },
  functions,
  interrupt::QueryGuard,
  schema::SCHEMA,
  search::{ComposedQuery, aggregate, compose},
};

const SHORTCODE_LEN: usize = 6;
const SHORTCODE_ATTEMPTS: usize = 16;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Cohort participant store backed by a single SQLite file.
///
/// Clones share one reference-counted connection. Concurrent
/// searches on clones are serialised on the connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn:      tokio_rusqlite::Connection,
  interrupt: Arc<rusqlite::InterruptHandle>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store, e.g. for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let interrupt = conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        functions::register(conn)?;
        Ok(conn.get_interrupt_handle())
      })
      .await?;
    Ok(Self { conn, interrupt: Arc::new(interrupt) })
  }
}

#[cfg(test)]
impl SqliteStore {
  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }
}

/// Outcome of the search closure, resolved into errors on the async side.
enum SearchOutcome {
  Rows(Vec<RawSearchRow>),
  ScopeNotFound,
  Cancelled,
}

fn exists(conn: &rusqlite::Connection, table: &str, id: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        &format!("SELECT 1 FROM {table} WHERE id = ?1"),
        rusqlite::params![id],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

fn random_shortcode() -> String {
  (0..SHORTCODE_LEN)
    .map(|_| char::from(b'A' + (OsRng.next_u32() % 26) as u8))
    .collect()
}

/// Draw shortcodes until one is unused. After too many collisions the last
/// draw is returned and the UNIQUE constraint reports the clash.
fn unused_shortcode(conn: &rusqlite::Connection) -> rusqlite::Result<String> {
  let mut code = random_shortcode();
  for _ in 1..SHORTCODE_ATTEMPTS {
    let taken = conn
      .query_row(
        "SELECT 1 FROM enrollees WHERE shortcode = ?1",
        rusqlite::params![code],
        |_| Ok(()),
      )
      .optional()?
      .is_some();
    if !taken {
      break;
    }
    code = random_shortcode();
  }
  Ok(code)
}

// ─── ParticipantStore impl ───────────────────────────────────────────────────

impl ParticipantStore for SqliteStore {
  type Error = Error;

  // ── Seeding ───────────────────────────────────────────────────────────────

  async fn add_study_environment(&self, name: &str) -> Result<StudyEnvironment> {
    let env = StudyEnvironment {
      id:         Uuid::new_v4(),
      name:       name.to_owned(),
      created_at: Utc::now(),
    };

    let id_str   = encode_uuid(env.id);
    let name_str = env.name.clone();
    let at_str   = encode_dt(env.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO study_environments (id, name, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(env)
  }

  async fn add_participant_user(&self, username: &str) -> Result<ParticipantUser> {
    let user = ParticipantUser {
      id:         Uuid::new_v4(),
      username:   username.to_owned(),
      created_at: Utc::now(),
      last_login: None,
    };

    let id_str       = encode_uuid(user.id);
    let username_str = user.username.clone();
    let at_str       = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO participant_users (id, username, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, username_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn record_login(&self, participant_user_id: Uuid, at: DateTime<Utc>) -> Result<()> {
    let id_str = encode_uuid(participant_user_id);
    let at_str = encode_dt(at);

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE participant_users SET last_login = ?2 WHERE id = ?1",
          rusqlite::params![id_str, at_str],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(cohort_core::Error::ParticipantUserNotFound(participant_user_id).into());
    }
    Ok(())
  }

  async fn add_profile(&self, input: NewProfile) -> Result<Profile> {
    let profile = Profile {
      id:            Uuid::new_v4(),
      given_name:    input.given_name,
      family_name:   input.family_name,
      contact_email: input.contact_email,
      phone_number:  input.phone_number,
      birth_date:    input.birth_date,
      sex_at_birth:  input.sex_at_birth,
      do_not_email:  input.do_not_email,
      created_at:    Utc::now(),
    };

    let id_str         = encode_uuid(profile.id);
    let given_name     = profile.given_name.clone();
    let family_name    = profile.family_name.clone();
    let contact_email  = profile.contact_email.clone();
    let phone_number   = profile.phone_number.clone();
    let birth_date_str = profile.birth_date.map(encode_date);
    let sex_at_birth   = profile.sex_at_birth.clone();
    let do_not_email   = profile.do_not_email;
    let at_str         = encode_dt(profile.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (
             id, given_name, family_name, contact_email, phone_number,
             birth_date, sex_at_birth, do_not_email, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str,
            given_name,
            family_name,
            contact_email,
            phone_number,
            birth_date_str,
            sex_at_birth,
            do_not_email,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(profile)
  }

  async fn enroll(&self, input: NewEnrollee) -> Result<Enrollee> {
    let NewEnrollee {
      study_environment_id,
      participant_user_id,
      profile_id,
      shortcode,
      consented,
    } = input;
    let id         = Uuid::new_v4();
    let created_at = Utc::now();

    let id_str      = encode_uuid(id);
    let env_str     = encode_uuid(study_environment_id);
    let user_str    = encode_uuid(participant_user_id);
    let profile_str = profile_id.map(encode_uuid);
    let at_str      = encode_dt(created_at);

    let shortcode = self
      .conn
      .call(move |conn| {
        if !exists(conn, "study_environments", &env_str)? {
          return Ok(Err(cohort_core::Error::StudyEnvironmentNotFound(
            study_environment_id,
          )));
        }
        if !exists(conn, "participant_users", &user_str)? {
          return Ok(Err(cohort_core::Error::ParticipantUserNotFound(
            participant_user_id,
          )));
        }
        if let (Some(profile_id), Some(profile_str)) = (profile_id, &profile_str)
          && !exists(conn, "profiles", profile_str)?
        {
          return Ok(Err(cohort_core::Error::ProfileNotFound(profile_id)));
        }

        let shortcode = match shortcode {
          Some(code) => code,
          None => unused_shortcode(conn)?,
        };

        conn.execute(
          "INSERT INTO enrollees (
             id, shortcode, study_environment_id, participant_user_id,
             profile_id, consented, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            shortcode,
            env_str,
            user_str,
            profile_str,
            consented,
            at_str,
          ],
        )?;
        Ok(Ok(shortcode))
      })
      .await??;

    Ok(Enrollee {
      id,
      shortcode,
      study_environment_id,
      participant_user_id,
      profile_id,
      consented,
      created_at,
    })
  }

  async fn add_task(&self, input: NewParticipantTask) -> Result<ParticipantTask> {
    let task = ParticipantTask {
      id:               Uuid::new_v4(),
      enrollee_id:      input.enrollee_id,
      target_stable_id: input.target_stable_id,
      status:           input.status,
      task_type:        input.task_type,
      created_at:       Utc::now(),
    };

    let id_str       = encode_uuid(task.id);
    let enrollee_id  = task.enrollee_id;
    let enrollee_str = encode_uuid(enrollee_id);
    let stable_id    = task.target_stable_id.clone();
    let status_str   = encode_task_status(task.status);
    let type_str     = encode_task_type(task.task_type);
    let at_str       = encode_dt(task.created_at);

    self
      .conn
      .call(move |conn| {
        if !exists(conn, "enrollees", &enrollee_str)? {
          return Ok(Err(cohort_core::Error::EnrolleeNotFound(enrollee_id)));
        }
        conn.execute(
          "INSERT INTO participant_tasks (
             id, enrollee_id, target_stable_id, status, task_type, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, enrollee_str, stable_id, status_str, type_str, at_str],
        )?;
        Ok(Ok(()))
      })
      .await??;

    Ok(task)
  }

  async fn add_kit_request(&self, input: NewKitRequest) -> Result<KitRequest> {
    let kit = KitRequest {
      id:          Uuid::new_v4(),
      enrollee_id: input.enrollee_id,
      kit_type:    input.kit_type,
      status:      input.status,
      created_at:  input.created_at.unwrap_or_else(Utc::now),
    };

    let id_str       = encode_uuid(kit.id);
    let enrollee_id  = kit.enrollee_id;
    let enrollee_str = encode_uuid(enrollee_id);
    let kit_type     = kit.kit_type.clone();
    let status_str   = encode_kit_status(kit.status);
    let at_str       = encode_dt(kit.created_at);

    self
      .conn
      .call(move |conn| {
        if !exists(conn, "enrollees", &enrollee_str)? {
          return Ok(Err(cohort_core::Error::EnrolleeNotFound(enrollee_id)));
        }
        conn.execute(
          "INSERT INTO kit_requests (id, enrollee_id, kit_type, status, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, enrollee_str, kit_type, status_str, at_str],
        )?;
        Ok(Ok(()))
      })
      .await??;

    Ok(kit)
  }

  // ── Search ────────────────────────────────────────────────────────────────

  async fn search(
    &self,
    study_environment_id: Uuid,
    facets: &[Facet],
  ) -> Result<Vec<EnrolleeSearchResult>> {
    let ComposedQuery { sql, binds, joins } =
      compose(study_environment_id, facets, Utc::now().date_naive())?;
    tracing::debug!(
      %study_environment_id,
      facets = facets.len(),
      ?joins,
      binds = binds.len(),
      %sql,
      "composed enrollee search"
    );

    let env_str = encode_uuid(study_environment_id);
    let (guard, ticket) = QueryGuard::new(Arc::clone(&self.interrupt));

    let outcome = self
      .conn
      .call(move |conn| {
        let Some(running) = ticket.start() else {
          return Ok(SearchOutcome::Cancelled);
        };
        if !exists(conn, "study_environments", &env_str)? {
          return Ok(SearchOutcome::ScopeNotFound);
        }
        if running.cancelled() {
          return Ok(SearchOutcome::Cancelled);
        }

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(binds.iter()), RawSearchRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(SearchOutcome::Rows(rows))
      })
      .await;
    guard.disarm();

    match outcome? {
      SearchOutcome::Rows(rows) => {
        let results = aggregate(rows)?;
        tracing::debug!(
          %study_environment_id,
          results = results.len(),
          "enrollee search finished"
        );
        Ok(results)
      }
      SearchOutcome::ScopeNotFound => {
        Err(cohort_core::Error::StudyEnvironmentNotFound(study_environment_id).into())
      }
      SearchOutcome::Cancelled => Err(Error::Cancelled),
    }
  }
}
