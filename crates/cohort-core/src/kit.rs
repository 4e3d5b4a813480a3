//! Sample kit requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KitRequestStatus {
  Created,
  Sent,
  Received,
  Errored,
}

/// A request to ship a sample kit to an enrollee. Requests are ordered by
/// `created_at`; the newest one carries the enrollee's current kit status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitRequest {
  pub id:          Uuid,
  pub enrollee_id: Uuid,
  pub kit_type:    String,
  pub status:      KitRequestStatus,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewKitRequest {
  pub enrollee_id: Uuid,
  pub kit_type:    String,
  pub status:      KitRequestStatus,
  /// Defaults to the time of insertion. Set explicitly when importing
  /// historical requests.
  pub created_at:  Option<DateTime<Utc>>,
}

impl NewKitRequest {
  pub fn new(enrollee_id: Uuid, kit_type: impl Into<String>) -> Self {
    Self {
      enrollee_id,
      kit_type: kit_type.into(),
      status: KitRequestStatus::Created,
      created_at: None,
    }
  }
}
