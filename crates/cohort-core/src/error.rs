//! Error types for `cohort-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::facet::{FacetGenerator, FacetValueKind};

#[derive(Debug, Error)]
pub enum Error {
  // ── Facet configuration ───────────────────────────────────────────────

  /// A facet paired a value with a generator that cannot interpret it.
  #[error("{generator} facets expect a {expected} value, got {found}")]
  FacetKindMismatch {
    generator: FacetGenerator,
    expected:  FacetValueKind,
    found:     FacetValueKind,
  },

  #[error("{generator} facets do not recognise field {field:?}")]
  UnknownFacetField {
    generator: FacetGenerator,
    field:     String,
  },

  /// A facet value that cannot be interpreted for its field, e.g. an unknown
  /// kit status.
  #[error("invalid value {value:?} for facet field {field:?}")]
  InvalidFacetValue { field: String, value: String },

  // ── Scope ─────────────────────────────────────────────────────────────

  #[error("a study environment id is required")]
  MissingStudyEnvironment,

  #[error("study environment not found: {0}")]
  StudyEnvironmentNotFound(Uuid),

  // ── Seeding lookups ───────────────────────────────────────────────────

  #[error("participant user not found: {0}")]
  ParticipantUserNotFound(Uuid),

  #[error("profile not found: {0}")]
  ProfileNotFound(Uuid),

  #[error("enrollee not found: {0}")]
  EnrolleeNotFound(Uuid),
}

impl Error {
  /// `true` for errors caused by a malformed facet list, as opposed to a bad
  /// scope or a lookup failure.
  pub fn is_configuration(&self) -> bool {
    matches!(
      self,
      Self::FacetKindMismatch { .. }
        | Self::UnknownFacetField { .. }
        | Self::InvalidFacetValue { .. }
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
