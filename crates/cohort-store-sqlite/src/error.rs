//! Error type for `cohort-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Facet configuration, scope and lookup errors.
  #[error(transparent)]
  Core(#[from] cohort_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The awaiting caller went away before the statement ran.
  #[error("search cancelled")]
  Cancelled,

  /// A stored column held a value outside its domain, e.g. an unknown status.
  #[error("cannot decode column value: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
