//! SQLite backend for the Cohort participant store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The faceted search lives in
//! [`search`]: facets are compiled into a single statement, executed once,
//! and folded into one result per enrollee.

mod encode;
mod functions;
mod interrupt;
mod schema;
mod store;

pub mod error;
pub mod search;

pub use error::{Error, Result};
pub use store::SqliteStore;
