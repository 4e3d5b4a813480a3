//! The seed file model.
//!
//! A seed file lists study environments with their enrollees, and optionally
//! the searches to run once everything is inserted:
//!
//! ```json
//! {
//!   "study_environments": [{
//!     "name": "sandbox",
//!     "enrollees": [{
//!       "username": "mark@test.example",
//!       "profile": { "given_name": "Mark", "birth_date": "1990-04-01" },
//!       "tasks": [{ "stable_id": "bigSurvey", "status": "COMPLETE" }],
//!       "kits": [{ "kit_type": "SALIVA", "status": "SENT" }]
//!     }]
//!   }],
//!   "searches": [{ "study_environment": "sandbox", "facets": [] }]
//! }
//! ```

use chrono::{DateTime, Utc};
use cohort_core::{
  facet::Facet,
  kit::KitRequestStatus,
  participant::NewProfile,
  task::{TaskStatus, TaskType},
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
  #[serde(default)]
  pub study_environments: Vec<SeedEnvironment>,
  #[serde(default)]
  pub searches:           Vec<SeedSearch>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedEnvironment {
  /// Referenced by [`SeedSearch::study_environment`]; unique within a file.
  pub name:      String,
  #[serde(default)]
  pub enrollees: Vec<SeedEnrollee>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedEnrollee {
  pub username:   String,
  /// Generated by the store when absent.
  #[serde(default)]
  pub shortcode:  Option<String>,
  #[serde(default)]
  pub consented:  bool,
  #[serde(default)]
  pub last_login: Option<DateTime<Utc>>,
  #[serde(default)]
  pub profile:    Option<NewProfile>,
  #[serde(default)]
  pub tasks:      Vec<SeedTask>,
  #[serde(default)]
  pub kits:       Vec<SeedKit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedTask {
  pub stable_id: String,
  pub status:    TaskStatus,
  #[serde(default = "default_task_type")]
  pub task_type: TaskType,
}

fn default_task_type() -> TaskType { TaskType::Survey }

#[derive(Debug, Clone, Deserialize)]
pub struct SeedKit {
  pub kit_type:   String,
  #[serde(default = "default_kit_status")]
  pub status:     KitRequestStatus,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

fn default_kit_status() -> KitRequestStatus { KitRequestStatus::Created }

/// A search to run after seeding, scoped by environment name.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedSearch {
  pub study_environment: String,
  #[serde(default)]
  pub facets:            Vec<Facet>,
}
