//! Unit tests for facet descriptors and errors.

use crate::{
  Error,
  facet::{Facet, FacetGenerator, FacetValue, FacetValueKind},
  task::TaskStatus,
};

#[test]
fn facet_deserialises_from_tagged_json() {
  let json = r#"{
    "generator": "profile",
    "value": { "kind": "strings", "key": "sexAtBirth", "values": ["male"] }
  }"#;

  let facet: Facet = serde_json::from_str(json).unwrap();
  assert_eq!(facet, Facet::profile("sexAtBirth", ["male"]));
}

#[test]
fn int_range_bounds_default_to_open() {
  let json = r#"{
    "generator": "profile_age",
    "value": { "kind": "int_range", "key": "age", "min": 50 }
  }"#;

  let facet: Facet = serde_json::from_str(json).unwrap();
  assert_eq!(facet, Facet::age(Some(50), None));
  match facet.value {
    FacetValue::IntRange(range) => assert!(!range.is_unbounded()),
    other => panic!("unexpected value {other:?}"),
  }
}

#[test]
fn combined_stable_id_statuses_use_screaming_case() {
  let json = r#"{
    "generator": "participant_task",
    "value": {
      "kind": "combined_stable_id",
      "key": "status",
      "values": [
        { "stable_id": "bigSurvey", "statuses": ["COMPLETE"] },
        { "stable_id": "otherSurvey", "statuses": ["IN_PROGRESS", "COMPLETE"] }
      ]
    }
  }"#;

  let facet: Facet = serde_json::from_str(json).unwrap();
  let expected = Facet::task_status([
    ("bigSurvey", vec![TaskStatus::Complete]),
    ("otherSurvey", vec![TaskStatus::InProgress, TaskStatus::Complete]),
  ]);
  assert_eq!(facet, expected);
}

#[test]
fn unknown_task_status_is_rejected_at_parse_time() {
  let json = r#"{
    "generator": "participant_task",
    "value": {
      "kind": "combined_stable_id",
      "key": "status",
      "values": [{ "stable_id": "bigSurvey", "statuses": ["DONE"] }]
    }
  }"#;

  assert!(serde_json::from_str::<Facet>(json).is_err());
}

#[test]
fn value_kind_and_key() {
  let keyword = Facet::keyword("mark");
  assert_eq!(keyword.value.kind(), FacetValueKind::Keyword);
  assert_eq!(keyword.value.key(), "keyword");

  let kit = Facet::kit_status(["SENT"]);
  assert_eq!(kit.generator, FacetGenerator::KitStatus);
  assert_eq!(kit.value.kind(), FacetValueKind::Strings);
  assert_eq!(kit.value.key(), "status");
}

#[test]
fn configuration_errors_are_classified() {
  let mismatch = Error::FacetKindMismatch {
    generator: FacetGenerator::ProfileAge,
    expected:  FacetValueKind::IntRange,
    found:     FacetValueKind::Strings,
  };
  assert!(mismatch.is_configuration());
  assert_eq!(
    mismatch.to_string(),
    "profile age facets expect a numeric range value, got exact-set"
  );

  assert!(!Error::MissingStudyEnvironment.is_configuration());
}
