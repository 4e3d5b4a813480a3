//! Facets: independently defined filter criteria for an enrollee search.
//!
//! A [`Facet`] pairs a [`FacetValue`] (what to match) with a
//! [`FacetGenerator`] (which column family the value is matched against).
//! Facets in one search are always combined with AND; a single facet may carry
//! richer logic internally (a set of allowed values, a range, several
//! stable-id requirements).
//!
//! Facets are request-scoped and never persisted. They deserialise from JSON
//! so a request layer can accept them verbatim:
//!
//! ```json
//! { "generator": "profile", "value": { "kind": "strings", "key": "sexAtBirth", "values": ["male"] } }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::task::TaskStatus;

// ─── Values ──────────────────────────────────────────────────────────────────

/// The column matches one of `values`. An empty list matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringFacetValue {
  pub key:    String,
  pub values: Vec<String>,
}

/// The derived integer lies within `[min, max]`. A missing bound is open on
/// that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRangeFacetValue {
  pub key: String,
  #[serde(default)]
  pub min: Option<i64>,
  #[serde(default)]
  pub max: Option<i64>,
}

impl IntRangeFacetValue {
  pub fn is_unbounded(&self) -> bool { self.min.is_none() && self.max.is_none() }
}

/// Case-insensitive substring match over names, email and shortcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordFacetValue {
  pub term: String,
}

/// One requirement of a [`CombinedStableIdFacetValue`]: at least one task for
/// `stable_id` whose status is in `statuses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StableIdStatusFacetValue {
  pub stable_id: String,
  pub statuses:  Vec<TaskStatus>,
}

/// Every listed requirement must hold, each satisfied by its own task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedStableIdFacetValue {
  pub key:    String,
  pub values: Vec<StableIdStatusFacetValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FacetValue {
  Strings(StringFacetValue),
  IntRange(IntRangeFacetValue),
  Keyword(KeywordFacetValue),
  CombinedStableId(CombinedStableIdFacetValue),
}

impl FacetValue {
  pub fn kind(&self) -> FacetValueKind {
    match self {
      Self::Strings(_) => FacetValueKind::Strings,
      Self::IntRange(_) => FacetValueKind::IntRange,
      Self::Keyword(_) => FacetValueKind::Keyword,
      Self::CombinedStableId(_) => FacetValueKind::CombinedStableId,
    }
  }

  /// The field this value filters on. Keyword values span several fields and
  /// report `"keyword"`.
  pub fn key(&self) -> &str {
    match self {
      Self::Strings(v) => &v.key,
      Self::IntRange(v) => &v.key,
      Self::Keyword(_) => "keyword",
      Self::CombinedStableId(v) => &v.key,
    }
  }
}

/// Discriminant of [`FacetValue`], used in configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetValueKind {
  Strings,
  IntRange,
  Keyword,
  CombinedStableId,
}

impl fmt::Display for FacetValueKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Strings => "exact-set",
      Self::IntRange => "numeric range",
      Self::Keyword => "keyword",
      Self::CombinedStableId => "combined stable-id",
    })
  }
}

// ─── Generators ──────────────────────────────────────────────────────────────

/// Selects the predicate generator that interprets a facet's value. The set
/// is closed; each backend provides one implementation per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetGenerator {
  /// Exact-set match on a profile column.
  Profile,
  /// Exact-set match on an enrollee column.
  Enrollee,
  /// Range match on age in whole years, derived from the profile birth date.
  ProfileAge,
  /// Substring match over names, contact email and shortcode.
  Keyword,
  /// Per-stable-id task status requirements.
  ParticipantTask,
  /// Exact-set match on the status of the most recent kit request.
  KitStatus,
}

impl fmt::Display for FacetGenerator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Profile => "profile",
      Self::Enrollee => "enrollee",
      Self::ProfileAge => "profile age",
      Self::Keyword => "keyword",
      Self::ParticipantTask => "participant task",
      Self::KitStatus => "kit status",
    })
  }
}

// ─── Facet ───────────────────────────────────────────────────────────────────

/// The unit passed into a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
  pub generator: FacetGenerator,
  pub value:     FacetValue,
}

impl Facet {
  pub fn new(generator: FacetGenerator, value: FacetValue) -> Self {
    Self { generator, value }
  }

  pub fn profile<I, S>(key: impl Into<String>, values: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self::new(FacetGenerator::Profile, strings(key, values))
  }

  pub fn enrollee<I, S>(key: impl Into<String>, values: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self::new(FacetGenerator::Enrollee, strings(key, values))
  }

  pub fn age(min: Option<i64>, max: Option<i64>) -> Self {
    Self::new(
      FacetGenerator::ProfileAge,
      FacetValue::IntRange(IntRangeFacetValue { key: "age".into(), min, max }),
    )
  }

  pub fn keyword(term: impl Into<String>) -> Self {
    Self::new(
      FacetGenerator::Keyword,
      FacetValue::Keyword(KeywordFacetValue { term: term.into() }),
    )
  }

  /// Require, for every `(stable_id, statuses)` pair, a task for that stable
  /// id in one of the statuses.
  pub fn task_status<I, S>(requirements: I) -> Self
  where
    I: IntoIterator<Item = (S, Vec<TaskStatus>)>,
    S: Into<String>,
  {
    let values = requirements
      .into_iter()
      .map(|(stable_id, statuses)| StableIdStatusFacetValue {
        stable_id: stable_id.into(),
        statuses,
      })
      .collect();
    Self::new(
      FacetGenerator::ParticipantTask,
      FacetValue::CombinedStableId(CombinedStableIdFacetValue {
        key: "status".into(),
        values,
      }),
    )
  }

  pub fn kit_status<I, S>(values: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self::new(FacetGenerator::KitStatus, strings("status", values))
  }
}

fn strings<I, S>(key: impl Into<String>, values: I) -> FacetValue
where
  I: IntoIterator<Item = S>,
  S: Into<String>,
{
  FacetValue::Strings(StringFacetValue {
    key:    key.into(),
    values: values.into_iter().map(Into::into).collect(),
  })
}
