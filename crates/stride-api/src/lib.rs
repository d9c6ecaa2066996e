//! JSON REST API for Stride.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`ProfileStore`] and [`SessionStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/v1", stride_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod profiles;
pub mod sessions;

use std::sync::Arc;

use axum::{Router, routing::get};
use stride_core::{
  ProfileRegistry, SessionLog,
  store::{ProfileStore, SessionStore},
};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub profiles: ProfileRegistry<S>,
  pub sessions: SessionLog<S, ProfileRegistry<S>>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      profiles: self.profiles.clone(),
      sessions: self.sessions.clone(),
    }
  }
}

impl<S> AppState<S>
where
  S: ProfileStore + SessionStore,
{
  /// Wire a registry and a session log over the same store.
  pub fn new(store: Arc<S>) -> Self {
    let profiles = ProfileRegistry::new(Arc::clone(&store));
    let sessions = SessionLog::new(store, profiles.clone());
    Self { profiles, sessions }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ProfileStore + SessionStore + 'static,
{
  Router::new()
    // Profiles
    .route("/profiles", get(profiles::list::<S>).post(profiles::create::<S>))
    .route("/profiles/summary", get(profiles::summary::<S>))
    .route("/profiles/search", get(profiles::search::<S>))
    .route("/profiles/older", get(profiles::older::<S>))
    .route("/profiles/by-email", get(profiles::by_email::<S>))
    .route(
      "/profiles/{id}",
      get(profiles::get_one::<S>)
        .patch(profiles::update::<S>)
        .delete(profiles::delete::<S>),
    )
    // Sessions
    .route("/sessions", get(sessions::list::<S>).post(sessions::create::<S>))
    .route("/sessions/ended", get(sessions::ended::<S>))
    .route("/sessions/owner/{owner_id}", get(sessions::by_owner::<S>))
    .route("/sessions/category/{category}", get(sessions::by_category::<S>))
    .route(
      "/sessions/{id}",
      get(sessions::get_one::<S>).patch(sessions::update::<S>),
    )
    .with_state(AppState::new(store))
}

// ─── Integration tests ────────────────────────────────────────────────────────
