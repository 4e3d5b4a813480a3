//! Predicate output of each generator, checked without a database.

use chrono::NaiveDate;
use cohort_core::{
  Error,
  facet::{Facet, FacetGenerator, FacetValue, FacetValueKind},
  task::TaskStatus,
};

use super::{BindValue, Join, MATCH_ALL, MATCH_NONE, PredicateContext, generator_for};

fn cx() -> PredicateContext {
  PredicateContext::new(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap())
}

fn predicate(facet: &Facet, cx: &mut PredicateContext) -> cohort_core::Result<String> {
  generator_for(facet.generator).predicate(&facet.value, cx)
}

fn text(s: &str) -> BindValue { BindValue::Text(s.to_owned()) }

#[test]
fn every_generator_reports_its_own_kind() {
  for kind in [
    FacetGenerator::Profile,
    FacetGenerator::Enrollee,
    FacetGenerator::ProfileAge,
    FacetGenerator::Keyword,
    FacetGenerator::ParticipantTask,
    FacetGenerator::KitStatus,
  ] {
    assert_eq!(generator_for(kind).kind(), kind);
  }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[test]
fn profile_binds_each_value() {
  let mut cx = cx();
  let sql = predicate(&Facet::profile("givenName", ["Mark", "Sally"]), &mut cx).unwrap();

  assert_eq!(sql, "p.given_name IN (?1, ?2)");
  assert_eq!(cx.binds, vec![text("Mark"), text("Sally")]);
  assert_eq!(generator_for(FacetGenerator::Profile).required_joins(), &[Join::Profile]);
}

#[test]
fn profile_empty_value_list_matches_nothing() {
  let mut cx = cx();
  let sql = predicate(&Facet::profile("sexAtBirth", Vec::<String>::new()), &mut cx).unwrap();
  assert_eq!(sql, MATCH_NONE);
  assert!(cx.binds.is_empty());
}

#[test]
fn profile_unknown_field_is_rejected() {
  let err = predicate(&Facet::profile("favouriteColour", ["blue"]), &mut cx()).unwrap_err();
  assert!(matches!(
    err,
    Error::UnknownFacetField { generator: FacetGenerator::Profile, ref field }
      if field == "favouriteColour"
  ));
}

#[test]
fn profile_rejects_non_string_values() {
  let facet = Facet::new(FacetGenerator::Profile, Facet::age(Some(1), None).value);
  let err = predicate(&facet, &mut cx()).unwrap_err();
  assert!(matches!(
    err,
    Error::FacetKindMismatch {
      generator: FacetGenerator::Profile,
      expected:  FacetValueKind::Strings,
      found:     FacetValueKind::IntRange,
    }
  ));
}

// ─── Enrollee ────────────────────────────────────────────────────────────────

#[test]
fn enrollee_consented_binds_integers() {
  let mut cx = cx();
  let sql = predicate(&Facet::enrollee("consented", ["true"]), &mut cx).unwrap();
  assert_eq!(sql, "e.consented IN (?1)");
  assert_eq!(cx.binds, vec![BindValue::Integer(1)]);
}

#[test]
fn enrollee_consented_rejects_other_words() {
  let err = predicate(&Facet::enrollee("consented", ["yes"]), &mut cx()).unwrap_err();
  assert!(matches!(
    err,
    Error::InvalidFacetValue { ref field, ref value } if field == "consented" && value == "yes"
  ));
}

#[test]
fn enrollee_shortcode_needs_no_join() {
  let mut cx = cx();
  let sql = predicate(&Facet::enrollee("shortcode", ["ABCDEF"]), &mut cx).unwrap();
  assert_eq!(sql, "e.shortcode IN (?1)");
  assert!(generator_for(FacetGenerator::Enrollee).required_joins().is_empty());
}

// ─── Age ─────────────────────────────────────────────────────────────────────

#[test]
fn age_binds_as_of_date_then_bounds() {
  let mut cx = cx();
  let sql = predicate(&Facet::age(Some(18), Some(40)), &mut cx).unwrap();

  assert_eq!(
    cx.binds,
    vec![text("2026-06-01"), BindValue::Integer(18), BindValue::Integer(40)]
  );
  assert!(sql.contains(">= ?2"));
  assert!(sql.contains("<= ?3"));
  assert!(sql.contains(" AND "));
}

#[test]
fn age_with_one_bound_has_one_comparison() {
  let mut cx = cx();
  let sql = predicate(&Facet::age(None, Some(40)), &mut cx).unwrap();
  assert!(!sql.contains(">="));
  assert!(sql.contains("<= ?2"));
  assert_eq!(cx.binds.len(), 2);
}

#[test]
fn age_without_bounds_matches_everything() {
  let mut cx = cx();
  assert_eq!(predicate(&Facet::age(None, None), &mut cx).unwrap(), MATCH_ALL);
  assert!(cx.binds.is_empty());
}

#[test]
fn age_key_must_be_age() {
  let mut facet = Facet::age(Some(1), None);
  if let FacetValue::IntRange(range) = &mut facet.value {
    range.key = "height".into();
  }
  let err = predicate(&facet, &mut cx()).unwrap_err();
  assert!(matches!(err, Error::UnknownFacetField { generator: FacetGenerator::ProfileAge, .. }));
}

// ─── Keyword ─────────────────────────────────────────────────────────────────

#[test]
fn keyword_is_bound_once_and_lowercased() {
  let mut cx = cx();
  let sql = predicate(&Facet::keyword("  MaRk "), &mut cx).unwrap();

  assert_eq!(cx.binds, vec![text("%mark%")]);
  assert_eq!(sql.matches("LIKE ?1").count(), 4);
  assert!(sql.contains("fold_case(e.shortcode)"));
  assert!(sql.contains("fold_case(p.contact_email)"));
  assert!(!sql.contains("lower("));
}

#[test]
fn keyword_escapes_like_metacharacters() {
  let mut cx = cx();
  predicate(&Facet::keyword(r"50%_a\b"), &mut cx).unwrap();
  assert_eq!(cx.binds, vec![text(r"%50\%\_a\\b%")]);
}

#[test]
fn blank_keyword_matches_everything() {
  let mut cx = cx();
  assert_eq!(predicate(&Facet::keyword("   "), &mut cx).unwrap(), MATCH_ALL);
  assert!(cx.binds.is_empty());
}

// ─── Participant task ────────────────────────────────────────────────────────

#[test]
fn task_pairs_become_separate_exists_checks() {
  let mut cx = cx();
  let facet = Facet::task_status([
    ("bigSurvey", vec![TaskStatus::Complete]),
    ("otherSurvey", vec![TaskStatus::New, TaskStatus::InProgress]),
  ]);
  let sql = predicate(&facet, &mut cx).unwrap();

  assert_eq!(sql.matches("EXISTS (").count(), 2);
  assert!(sql.contains(") AND EXISTS ("));
  assert_eq!(
    cx.binds,
    vec![
      text("bigSurvey"),
      text("COMPLETE"),
      text("otherSurvey"),
      text("NEW"),
      text("IN_PROGRESS"),
    ]
  );
}

#[test]
fn task_pair_without_statuses_matches_nothing() {
  let mut cx = cx();
  let facet = Facet::task_status([("bigSurvey", vec![])]);
  assert_eq!(predicate(&facet, &mut cx).unwrap(), MATCH_NONE);
  assert!(cx.binds.is_empty());
}

#[test]
fn task_without_pairs_matches_everything() {
  let facet = Facet::task_status(Vec::<(String, Vec<TaskStatus>)>::new());
  assert_eq!(predicate(&facet, &mut cx()).unwrap(), MATCH_ALL);
}

#[test]
fn task_rejects_keyword_values() {
  let facet = Facet::new(FacetGenerator::ParticipantTask, Facet::keyword("x").value);
  let err = predicate(&facet, &mut cx()).unwrap_err();
  assert!(err.is_configuration());
}

// ─── Kit status ──────────────────────────────────────────────────────────────

#[test]
fn kit_status_filters_the_latest_kit() {
  let mut cx = cx();
  let sql = predicate(&Facet::kit_status(["SENT", "RECEIVED"]), &mut cx).unwrap();

  assert_eq!(sql, "latest_kit.status IN (?1, ?2)");
  assert_eq!(
    generator_for(FacetGenerator::KitStatus).required_joins(),
    &[Join::LatestKitRequest]
  );
}

#[test]
fn kit_status_rejects_unknown_status() {
  let err = predicate(&Facet::kit_status(["LOST"]), &mut cx()).unwrap_err();
  assert!(matches!(
    err,
    Error::InvalidFacetValue { ref value, .. } if value == "LOST"
  ));
}
