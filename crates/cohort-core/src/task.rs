//! Participant tasks: units of required work (surveys, consents, kits).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
  New,
  Viewed,
  InProgress,
  Complete,
  Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
  Consent,
  Survey,
  KitRequest,
}

/// One instance of a task definition assigned to an enrollee. An enrollee may
/// hold several tasks for the same `target_stable_id` over time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantTask {
  pub id:               Uuid,
  pub enrollee_id:      Uuid,
  /// Names the task definition (survey, consent form) this task instantiates.
  pub target_stable_id: String,
  pub status:           TaskStatus,
  pub task_type:        TaskType,
  pub created_at:       DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewParticipantTask {
  pub enrollee_id:      Uuid,
  pub target_stable_id: String,
  pub status:           TaskStatus,
  pub task_type:        TaskType,
}

impl NewParticipantTask {
  pub fn survey(
    enrollee_id: Uuid,
    target_stable_id: impl Into<String>,
    status: TaskStatus,
  ) -> Self {
    Self {
      enrollee_id,
      target_stable_id: target_stable_id.into(),
      status,
      task_type: TaskType::Survey,
    }
  }
}
