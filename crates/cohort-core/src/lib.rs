//! Core types and trait definitions for Cohort, the enrollee search engine.
//!
//! This crate has no database dependencies. Facet values and
//! facet descriptors are plain data; turning them into SQL is the job of a
//! storage backend (e.g. `cohort-store-sqlite`).

pub mod error;
pub mod facet;
pub mod kit;
pub mod participant;
pub mod search;
pub mod store;
pub mod task;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
