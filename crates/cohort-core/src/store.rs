//! The `ParticipantStore` trait.
//!
//! Implemented by storage backends (e.g. `cohort-store-sqlite`). Callers that
//! run searches depend on this abstraction, not on a concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  facet::Facet,
  kit::{KitRequest, NewKitRequest},
  participant::{
    Enrollee, NewEnrollee, NewProfile, ParticipantUser, Profile,
    StudyEnvironment,
  },
  search::EnrolleeSearchResult,
  task::{NewParticipantTask, ParticipantTask},
};

/// Abstraction over a participant store backend.
///
/// The write methods form a minimal, append-only seeding surface used by
/// fixtures and the populate tool; record maintenance belongs to the services
/// that own each record type.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes.
pub trait ParticipantStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Seeding ───────────────────────────────────────────────────────────

  fn add_study_environment<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<StudyEnvironment, Self::Error>> + Send + 'a;

  /// Create a participant user. Usernames are unique.
  fn add_participant_user<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<ParticipantUser, Self::Error>> + Send + 'a;

  /// Stamp `last_login` on a participant user.
  fn record_login(
    &self,
    participant_user_id: Uuid,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn add_profile(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Enroll a participant user in a study environment. A shortcode is
  /// generated when the input does not carry one.
  fn enroll(
    &self,
    input: NewEnrollee,
  ) -> impl Future<Output = Result<Enrollee, Self::Error>> + Send + '_;

  fn add_task(
    &self,
    input: NewParticipantTask,
  ) -> impl Future<Output = Result<ParticipantTask, Self::Error>> + Send + '_;

  fn add_kit_request(
    &self,
    input: NewKitRequest,
  ) -> impl Future<Output = Result<KitRequest, Self::Error>> + Send + '_;

  // ── Search ────────────────────────────────────────────────────────────

  /// Return one result per enrollee of `study_environment_id` matching every
  /// facet. An empty facet list returns every enrollee in the environment.
  ///
  /// Fails without touching the data when a facet is malformed, and never
  /// returns partial results.
  fn search<'a>(
    &'a self,
    study_environment_id: Uuid,
    facets: &'a [Facet],
  ) -> impl Future<Output = Result<Vec<EnrolleeSearchResult>, Self::Error>>
  + Send
  + 'a;
}
