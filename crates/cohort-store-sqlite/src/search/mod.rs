//! Faceted enrollee search.
//!
//! A search is compiled into exactly one SQL statement:
//!
//! 1. [`compose`] asks the [`FacetSqlGenerator`] behind each facet for the
//!    joins it needs and a parameterised predicate, deduplicates the joins,
//!    and ANDs every predicate with the mandatory study-environment scope.
//! 2. The store executes the statement once.
//! 3. [`aggregate`] folds the rows into one [`EnrolleeSearchResult`] per
//!    enrollee.
//!
//! One-to-many relations never fan rows out: tasks are reached only through
//! correlated `EXISTS` checks, kit requests only through a scalar sub-select
//! or a derived table holding one row per enrollee.
//!
//! [`EnrolleeSearchResult`]: cohort_core::search::EnrolleeSearchResult

mod aggregate;
mod bind;
mod compose;
mod generator;

pub(crate) use aggregate::aggregate;
pub use bind::BindValue;
pub use compose::{ComposedQuery, compose};
pub use generator::{FacetSqlGenerator, Join, PredicateContext, generator_for};
