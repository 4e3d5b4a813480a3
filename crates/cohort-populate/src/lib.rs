//! Seed a participant store from a JSON file and run searches against it.
//!
//! The binary wires this to a SQLite store; the functions here work against
//! any [`ParticipantStore`].

pub mod error;
pub mod seed;

use std::{collections::HashMap, path::PathBuf};

use cohort_core::{
  kit::NewKitRequest,
  participant::NewEnrollee,
  search::EnrolleeSearchResult,
  store::ParticipantStore,
  task::NewParticipantTask,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use error::{Error, Result};
use seed::{SeedEnrollee, SeedFile, SeedSearch};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Settings read from the optional config file and `COHORT_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct PopulateConfig {
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// Pretty-print search output.
  #[serde(default)]
  pub pretty:     bool,
}

fn default_store_path() -> PathBuf { PathBuf::from("cohort.db") }

impl Default for PopulateConfig {
  fn default() -> Self { Self { store_path: default_store_path(), pretty: false } }
}

// ─── Seeding ─────────────────────────────────────────────────────────────────

/// Study environment ids created by [`populate`], keyed by seed name.
pub type Environments = HashMap<String, Uuid>;

/// Insert every environment and enrollee of `seed`.
///
/// Rows are written in file order. A failure part-way leaves what was already
/// written in place.
pub async fn populate<S>(store: &S, seed: &SeedFile) -> Result<Environments>
where
  S: ParticipantStore,
{
  let mut environments = Environments::new();

  for env in &seed.study_environments {
    if environments.contains_key(&env.name) {
      return Err(Error::DuplicateEnvironment(env.name.clone()));
    }
    let created = store
      .add_study_environment(&env.name)
      .await
      .map_err(Error::store)?;
    tracing::info!(name = %env.name, id = %created.id, "created study environment");

    for enrollee in &env.enrollees {
      add_enrollee(store, created.id, enrollee).await?;
    }
    tracing::info!(
      name = %env.name,
      enrollees = env.enrollees.len(),
      "seeded study environment"
    );
    environments.insert(env.name.clone(), created.id);
  }

  Ok(environments)
}

async fn add_enrollee<S>(store: &S, env_id: Uuid, seed: &SeedEnrollee) -> Result<()>
where
  S: ParticipantStore,
{
  let user = store
    .add_participant_user(&seed.username)
    .await
    .map_err(Error::store)?;
  if let Some(at) = seed.last_login {
    store.record_login(user.id, at).await.map_err(Error::store)?;
  }

  let mut input = NewEnrollee::new(env_id, user.id);
  input.shortcode = seed.shortcode.clone();
  input.consented = seed.consented;
  if let Some(profile) = &seed.profile {
    let profile = store.add_profile(profile.clone()).await.map_err(Error::store)?;
    input = input.with_profile(profile.id);
  }
  let enrollee = store.enroll(input).await.map_err(Error::store)?;

  for task in &seed.tasks {
    store
      .add_task(NewParticipantTask {
        enrollee_id:      enrollee.id,
        target_stable_id: task.stable_id.clone(),
        status:           task.status,
        task_type:        task.task_type,
      })
      .await
      .map_err(Error::store)?;
  }
  for kit in &seed.kits {
    store
      .add_kit_request(NewKitRequest {
        enrollee_id: enrollee.id,
        kit_type:    kit.kit_type.clone(),
        status:      kit.status,
        created_at:  kit.created_at,
      })
      .await
      .map_err(Error::store)?;
  }

  tracing::debug!(shortcode = %enrollee.shortcode, username = %seed.username, "enrolled");
  Ok(())
}

// ─── Searches ────────────────────────────────────────────────────────────────

/// The output of one seeded search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
  pub study_environment: String,
  pub results:           Vec<EnrolleeSearchResult>,
}

/// Run `searches` against environments created by [`populate`].
pub async fn run_searches<S>(
  store: &S,
  environments: &Environments,
  searches: &[SeedSearch],
) -> Result<Vec<SearchReport>>
where
  S: ParticipantStore,
{
  let mut reports = Vec::with_capacity(searches.len());
  for search in searches {
    let env_id = environments
      .get(&search.study_environment)
      .copied()
      .ok_or_else(|| Error::UnknownEnvironment(search.study_environment.clone()))?;
    let results = store
      .search(env_id, &search.facets)
      .await
      .map_err(Error::store)?;
    tracing::info!(
      study_environment = %search.study_environment,
      facets = search.facets.len(),
      results = results.len(),
      "ran search"
    );
    reports.push(SearchReport {
      study_environment: search.study_environment.clone(),
      results,
    });
  }
  Ok(reports)
}

#[cfg(test)]
mod tests;
