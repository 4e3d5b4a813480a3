//! Error types for `cohort-populate`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("study environment {0:?} is declared twice")]
  DuplicateEnvironment(String),
  #[error("search refers to unknown study environment {0:?}")]
  UnknownEnvironment(String),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
