//! The persistence port: `ProfileStore` and `SessionStore`.
//!
//! The traits are implemented by storage backends (e.g.
//! `stride-store-sqlite`). The services in this crate depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  profile::{NewProfile, Profile},
  session::{ActivityType, NewSession, Session},
};

// ─── Profiles ────────────────────────────────────────────────────────────────

/// Key-addressable storage for profiles.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ProfileStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a profile by UUID. Returns `None` if not found.
  fn find_profile(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// All profiles, in insertion order.
  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  /// Exact, case-sensitive email lookup.
  fn find_profile_by_email(
    &self,
    email: &str,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send;

  /// Profiles whose email contains `fragment`, ignoring case.
  fn search_profiles_by_email(
    &self,
    fragment: &str,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send;

  /// Profiles born strictly before `date`.
  fn profiles_born_before(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  fn profile_exists(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Persist a new profile. The store assigns `profile_id`; `input.id` is
  /// ignored.
  fn insert_profile(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Upsert a profile by its `profile_id`.
  fn save_profile(
    &self,
    profile: Profile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Remove a profile. Removing an absent id is not an error.
  fn delete_profile(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Sessions ────────────────────────────────────────────────────────────────

/// Key-addressable storage for sessions.
///
/// The store does not check that `owner_id` names an existing profile; that
/// is the caller's job.
pub trait SessionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn find_session(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + '_;

  /// All sessions, in insertion order.
  fn list_sessions(
    &self,
  ) -> impl Future<Output = Result<Vec<Session>, Self::Error>> + Send + '_;

  fn sessions_by_owner(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Session>, Self::Error>> + Send + '_;

  fn sessions_by_category(
    &self,
    category: ActivityType,
  ) -> impl Future<Output = Result<Vec<Session>, Self::Error>> + Send + '_;

  fn session_exists(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Persist a new session, using `input.session_id` if supplied and a fresh
  /// UUID otherwise.
  ///
  /// Never overwrites: returns `None` if a session with that id is already
  /// stored, checked atomically with the write.
  fn insert_session(
    &self,
    input: NewSession,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + '_;

  /// Upsert a session by its `session_id`.
  fn save_session(
    &self,
    session: Session,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;
}
