//! The denormalised search result row.

use serde::{Deserialize, Serialize};

use crate::{
  kit::KitRequestStatus,
  participant::{Enrollee, ParticipantUser, Profile},
};

/// One matching enrollee with its identity, profile and current kit status.
///
/// Constructed fresh per search; never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrolleeSearchResult {
  pub enrollee:               Enrollee,
  pub participant_user:       ParticipantUser,
  /// `None` when the enrollee has no profile attached.
  pub profile:                Option<Profile>,
  /// Status of the newest kit request; `None` when none was ever made.
  pub most_recent_kit_status: Option<KitRequestStatus>,
}
