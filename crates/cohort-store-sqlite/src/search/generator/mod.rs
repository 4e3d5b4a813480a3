//! Predicate generators, one per [`FacetGenerator`] variant.
//!
//! A generator declares the joins its predicate references and turns a
//! [`FacetValue`] into a boolean SQL fragment whose parameters are appended to
//! the shared bind list. The fragment may only reference the enrollee alias
//! `e` and the aliases introduced by its declared joins.

mod age;
mod enrollee;
mod keyword;
mod kit;
mod profile;
mod task;

use chrono::NaiveDate;
use cohort_core::{
  Error, Result,
  facet::{FacetGenerator, FacetValue, FacetValueKind, StringFacetValue},
};

use super::bind::{BindValue, push_in_list};

pub(super) const MATCH_ALL: &str = "1 = 1";
pub(super) const MATCH_NONE: &str = "0 = 1";

// ─── Joins ───────────────────────────────────────────────────────────────────

/// A join onto the `enrollees e` base table. Each yields at most one row per
/// enrollee, so adding one never multiplies result rows.
///
/// Joins are rendered in declaration order, which keeps the statement text
/// stable regardless of facet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Join {
  /// `pu`: the enrollee's participant user.
  ParticipantUser,
  /// `p`: the enrollee's profile, if any.
  Profile,
  /// `latest_kit`: the newest kit request per enrollee, if any. Only kit
  /// requests of the searched study environment (`?1`) are windowed.
  LatestKitRequest,
}

impl Join {
  pub fn sql(self) -> &'static str {
    match self {
      Self::ParticipantUser => {
        "JOIN participant_users pu ON pu.id = e.participant_user_id"
      }
      Self::Profile => "LEFT JOIN profiles p ON p.id = e.profile_id",
      Self::LatestKitRequest => {
        "LEFT JOIN (
  SELECT kr.enrollee_id, kr.status,
         ROW_NUMBER() OVER (
           PARTITION BY kr.enrollee_id
           ORDER BY kr.created_at DESC, kr.id DESC
         ) AS rn
  FROM kit_requests kr
  WHERE kr.enrollee_id IN (
    SELECT id FROM enrollees WHERE study_environment_id = ?1
  )
) latest_kit ON latest_kit.enrollee_id = e.id AND latest_kit.rn = 1"
      }
    }
  }
}

// ─── Generator contract ──────────────────────────────────────────────────────

/// Per-statement state shared by every generator of one search.
#[derive(Debug)]
pub struct PredicateContext {
  /// The date derived values (such as age) are computed against.
  pub as_of: NaiveDate,
  pub binds: Vec<BindValue>,
}

impl PredicateContext {
  pub fn new(as_of: NaiveDate) -> Self { Self { as_of, binds: Vec::new() } }
}

pub trait FacetSqlGenerator: Send + Sync {
  /// The facet generator this implementation serves.
  fn kind(&self) -> FacetGenerator;

  /// Joins referenced by [`predicate`](Self::predicate).
  fn required_joins(&self) -> &'static [Join];

  /// Build the predicate for `value`, binding its parameters into `cx`.
  ///
  /// Fails with a configuration error when `value` is of the wrong kind or
  /// names a field this generator does not recognise.
  fn predicate(&self, value: &FacetValue, cx: &mut PredicateContext) -> Result<String>;
}

/// Resolve the generator for a facet.
pub fn generator_for(kind: FacetGenerator) -> &'static dyn FacetSqlGenerator {
  match kind {
    FacetGenerator::Profile => &profile::ProfileFacetSqlGenerator,
    FacetGenerator::Enrollee => &enrollee::EnrolleeFacetSqlGenerator,
    FacetGenerator::ProfileAge => &age::ProfileAgeFacetSqlGenerator,
    FacetGenerator::Keyword => &keyword::KeywordFacetSqlGenerator,
    FacetGenerator::ParticipantTask => &task::ParticipantTaskFacetSqlGenerator,
    FacetGenerator::KitStatus => &kit::KitStatusFacetSqlGenerator,
  }
}

// ─── Shared helpers ──────────────────────────────────────────────────────────

fn mismatch(
  generator: FacetGenerator,
  expected: FacetValueKind,
  value: &FacetValue,
) -> Error {
  Error::FacetKindMismatch { generator, expected, found: value.kind() }
}

fn unknown_field(generator: FacetGenerator, field: &str) -> Error {
  Error::UnknownFacetField { generator, field: field.to_owned() }
}

fn expect_strings(
  generator: FacetGenerator,
  value: &FacetValue,
) -> Result<&StringFacetValue> {
  match value {
    FacetValue::Strings(v) => Ok(v),
    other => Err(mismatch(generator, FacetValueKind::Strings, other)),
  }
}

/// `column IN (...)` over already-converted values; an empty list matches
/// nothing.
fn column_in(
  column: &str,
  values: Vec<BindValue>,
  binds: &mut Vec<BindValue>,
) -> String {
  if values.is_empty() {
    return MATCH_NONE.to_owned();
  }
  format!("{column} IN ({})", push_in_list(binds, values))
}

/// `column IN (...)` over text values.
fn text_in(column: &str, values: &[String], binds: &mut Vec<BindValue>) -> String {
  column_in(
    column,
    values.iter().cloned().map(BindValue::Text).collect(),
    binds,
  )
}

#[cfg(test)]
mod tests;
