//! The query composer: facets in, one parameterised statement out.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use cohort_core::{Error, Result, facet::Facet};
use uuid::Uuid;

use super::{
  bind::{BindValue, push_text},
  generator::{Join, PredicateContext, generator_for},
};
use crate::encode::{SEARCH_COLUMNS, encode_uuid};

/// Joins every statement carries; they feed the output columns.
const BASE_JOINS: [Join; 2] = [Join::ParticipantUser, Join::Profile];

/// Newest kit status per enrollee, newest first by creation time with the id
/// as a deterministic tie-break. Always selected, whatever the facets.
const MOST_RECENT_KIT_STATUS: &str = "(
    SELECT kr.status FROM kit_requests kr
    WHERE kr.enrollee_id = e.id
    ORDER BY kr.created_at DESC, kr.id DESC
    LIMIT 1
  ) AS most_recent_kit_status";

/// A composed search statement and its positional parameters.
#[derive(Debug, Clone)]
pub struct ComposedQuery {
  pub sql:   String,
  pub binds: Vec<BindValue>,
  /// The deduplicated joins the statement uses, in rendering order.
  pub joins: Vec<Join>,
}

/// Compose the search statement for `facets` within `study_environment_id`.
///
/// The scope predicate is always `?1`. Each facet contributes one
/// parenthesised predicate; all are ANDed. Derived values such as age are
/// computed as of `as_of`.
///
/// Fails on a nil scope id before anything is composed, and on the first
/// malformed facet.
pub fn compose(
  study_environment_id: Uuid,
  facets: &[Facet],
  as_of: NaiveDate,
) -> Result<ComposedQuery> {
  if study_environment_id.is_nil() {
    return Err(Error::MissingStudyEnvironment);
  }

  let mut cx = PredicateContext::new(as_of);
  let scope = push_text(&mut cx.binds, encode_uuid(study_environment_id));

  let mut joins: BTreeSet<Join> = BASE_JOINS.into_iter().collect();
  let mut predicates = vec![format!("e.study_environment_id = ?{scope}")];

  for facet in facets {
    let generator = generator_for(facet.generator);
    joins.extend(generator.required_joins().iter().copied());
    let predicate = generator.predicate(&facet.value, &mut cx)?;
    predicates.push(format!("({predicate})"));
  }

  let joins: Vec<Join> = joins.into_iter().collect();
  let join_sql = joins
    .iter()
    .map(|join| join.sql())
    .collect::<Vec<_>>()
    .join("\n");

  let sql = format!(
    "SELECT\n  {SEARCH_COLUMNS},\n  {MOST_RECENT_KIT_STATUS}\n\
     FROM enrollees e\n\
     {join_sql}\n\
     WHERE {}\n\
     ORDER BY e.created_at, e.id",
    predicates.join("\n  AND ")
  );

  Ok(ComposedQuery { sql, binds: cx.binds, joins })
}

#[cfg(test)]
mod tests {
  use cohort_core::{
    Error,
    facet::{Facet, FacetGenerator, FacetValueKind},
    task::TaskStatus,
  };

  use super::*;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 6, 1).unwrap() }

  #[test]
  fn scope_only_without_facets() {
    let env = Uuid::new_v4();
    let q = compose(env, &[], today()).unwrap();

    assert_eq!(q.binds, vec![BindValue::Text(encode_uuid(env))]);
    assert!(q.sql.contains("WHERE e.study_environment_id = ?1\nORDER BY"));
    assert_eq!(q.joins, vec![Join::ParticipantUser, Join::Profile]);
    assert!(q.sql.contains("AS most_recent_kit_status"));
    assert!(!q.sql.contains("latest_kit"));
  }

  #[test]
  fn nil_scope_is_rejected_before_composition() {
    let err = compose(Uuid::nil(), &[Facet::keyword("x")], today()).unwrap_err();
    assert!(matches!(err, Error::MissingStudyEnvironment));
  }

  #[test]
  fn joins_are_deduplicated_across_facets() {
    let facets = [
      Facet::profile("sexAtBirth", ["female"]),
      Facet::age(Some(18), None),
      Facet::keyword("smith"),
      Facet::kit_status(["SENT"]),
      Facet::kit_status(["SENT", "RECEIVED"]),
    ];
    let q = compose(Uuid::new_v4(), &facets, today()).unwrap();

    assert_eq!(
      q.joins,
      vec![Join::ParticipantUser, Join::Profile, Join::LatestKitRequest]
    );
    assert_eq!(q.sql.matches("LEFT JOIN profiles p").count(), 1);
    assert_eq!(q.sql.matches(") latest_kit ON").count(), 1);
  }

  #[test]
  fn latest_kit_window_is_limited_to_the_scope() {
    let q = compose(Uuid::new_v4(), &[Facet::kit_status(["SENT"])], today()).unwrap();
    assert!(
      q.sql
        .contains("WHERE kr.enrollee_id IN (\n    SELECT id FROM enrollees WHERE study_environment_id = ?1")
    );
  }

  #[test]
  fn placeholders_follow_bind_order() {
    let facets = [
      Facet::profile("sexAtBirth", ["male", "female"]),
      Facet::task_status([("bigSurvey", vec![TaskStatus::Complete])]),
    ];
    let q = compose(Uuid::new_v4(), &facets, today()).unwrap();

    assert_eq!(q.binds.len(), 5);
    assert!(q.sql.contains("(p.sex_at_birth IN (?2, ?3))"));
    assert!(q.sql.contains("pt.target_stable_id = ?4 AND pt.status IN (?5)"));
    assert_eq!(q.binds[4], BindValue::Text("COMPLETE".into()));
  }

  #[test]
  fn facet_order_does_not_change_joins() {
    let a = [Facet::kit_status(["SENT"]), Facet::keyword("x")];
    let b = [Facet::keyword("x"), Facet::kit_status(["SENT"])];
    let qa = compose(Uuid::new_v4(), &a, today()).unwrap();
    let qb = compose(Uuid::new_v4(), &b, today()).unwrap();
    assert_eq!(qa.joins, qb.joins);
  }

  #[test]
  fn first_malformed_facet_fails_the_whole_statement() {
    let facets = [
      Facet::keyword("ok"),
      Facet::new(FacetGenerator::ProfileAge, Facet::keyword("bad").value),
    ];
    let err = compose(Uuid::new_v4(), &facets, today()).unwrap_err();
    assert!(matches!(
      err,
      Error::FacetKindMismatch {
        generator: FacetGenerator::ProfileAge,
        expected:  FacetValueKind::IntRange,
        found:     FacetValueKind::Keyword,
      }
    ));
  }
}
