use cohort_core::{kit::KitRequestStatus, store::ParticipantStore};
use cohort_store_sqlite::SqliteStore;

use crate::{Error, PopulateConfig, populate, run_searches, seed::SeedFile};

const SEED: &str = r#"{
  "study_environments": [
    {
      "name": "sandbox",
      "enrollees": [
        {
          "username": "mark@test.example",
          "shortcode": "MARKKK",
          "consented": true,
          "last_login": "2026-01-02T03:04:05Z",
          "profile": { "given_name": "Mark", "sex_at_birth": "male", "birth_date": "1990-04-01" },
          "tasks": [
            { "stable_id": "bigSurvey", "status": "COMPLETE" },
            { "stable_id": "consent", "status": "COMPLETE", "task_type": "CONSENT" }
          ],
          "kits": [
            { "kit_type": "SALIVA", "status": "SENT", "created_at": "2026-01-05T00:00:00Z" },
            { "kit_type": "SALIVA", "created_at": "2026-01-01T00:00:00Z" }
          ]
        },
        { "username": "sally@test.example" }
      ]
    },
    {
      "name": "irb",
      "enrollees": [{ "username": "other@test.example" }]
    }
  ],
  "searches": [
    { "study_environment": "sandbox" },
    {
      "study_environment": "sandbox",
      "facets": [
        { "generator": "keyword", "value": { "kind": "keyword", "term": "mark" } },
        {
          "generator": "participant_task",
          "value": {
            "kind": "combined_stable_id",
            "key": "status",
            "values": [{ "stable_id": "bigSurvey", "statuses": ["COMPLETE"] }]
          }
        }
      ]
    }
  ]
}"#;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

#[tokio::test]
async fn seeds_and_runs_searches() {
  let s = store().await;
  let seed: SeedFile = serde_json::from_str(SEED).unwrap();

  let environments = populate(&s, &seed).await.unwrap();
  assert_eq!(environments.len(), 2);

  let reports = run_searches(&s, &environments, &seed.searches).await.unwrap();
  assert_eq!(reports.len(), 2);
  assert_eq!(reports[0].results.len(), 2);

  let hits = &reports[1].results;
  assert_eq!(hits.len(), 1);
  let mark = &hits[0];
  assert_eq!(mark.enrollee.shortcode, "MARKKK");
  assert!(mark.enrollee.consented);
  assert!(mark.participant_user.last_login.is_some());
  assert_eq!(mark.profile.as_ref().unwrap().sex_at_birth.as_deref(), Some("male"));
  assert_eq!(mark.most_recent_kit_status, Some(KitRequestStatus::Sent));

  let irb = s.search(environments["irb"], &[]).await.unwrap();
  assert_eq!(irb.len(), 1);
  assert_eq!(irb[0].participant_user.username, "other@test.example");
}

#[tokio::test]
async fn search_against_unknown_environment_fails() {
  let s = store().await;
  let seed: SeedFile = serde_json::from_str(
    r#"{ "searches": [{ "study_environment": "missing" }] }"#,
  )
  .unwrap();

  let environments = populate(&s, &seed).await.unwrap();
  let err = run_searches(&s, &environments, &seed.searches).await.unwrap_err();
  assert!(matches!(err, Error::UnknownEnvironment(ref name) if name == "missing"));
}

#[tokio::test]
async fn duplicate_environment_names_are_rejected() {
  let s = store().await;
  let seed: SeedFile = serde_json::from_str(
    r#"{ "study_environments": [{ "name": "a" }, { "name": "a" }] }"#,
  )
  .unwrap();

  let err = populate(&s, &seed).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateEnvironment(ref name) if name == "a"));
}

#[tokio::test]
async fn store_failures_are_wrapped() {
  let s = store().await;
  let seed: SeedFile = serde_json::from_str(
    r#"{ "study_environments": [{
      "name": "sandbox",
      "enrollees": [{ "username": "same" }, { "username": "same" }]
    }] }"#,
  )
  .unwrap();

  let err = populate(&s, &seed).await.unwrap_err();
  assert!(matches!(err, Error::Store(_)));
}

#[test]
fn config_defaults() {
  let cfg: PopulateConfig = serde_json::from_str("{}").unwrap();
  assert_eq!(cfg.store_path, PopulateConfig::default().store_path);
  assert!(!cfg.pretty);
}
