//! The session log: creation, merge updates and queries over all sessions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  Error, Result,
  registry::ProfileLookup,
  resolve::resolve_owner,
  session::{ActivityType, NewSession, Session, SessionPatch},
  store::SessionStore,
};

/// Owns the session lifecycle.
///
/// `S` persists sessions; `L` is the read-only profile capability used to
/// check that every session's owner exists before it is written.
pub struct SessionLog<S, L> {
  store:    Arc<S>,
  profiles: L,
}

impl<S, L: Clone> Clone for SessionLog<S, L> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      profiles: self.profiles.clone(),
    }
  }
}

impl<S, L> SessionLog<S, L>
where
  S: SessionStore,
  L: ProfileLookup,
{
  pub fn new(store: Arc<S>, profiles: L) -> Self { Self { store, profiles } }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn list_all(&self) -> Result<Vec<Session>> {
    self.store.list_sessions().await.map_err(Error::store)
  }

  /// Returns `None` if no session has this id.
  pub async fn get(&self, id: Uuid) -> Result<Option<Session>> {
    self.store.find_session(id).await.map_err(Error::store)
  }

  /// Sessions owned by `owner_id`. Fails with [`Error::InvalidReference`] if
  /// the profile does not exist, even though the answer would be empty.
  pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Session>> {
    let owner = resolve_owner(&self.profiles, owner_id).await?;
    self
      .store
      .sessions_by_owner(owner.profile_id)
      .await
      .map_err(Error::store)
  }

  pub async fn list_by_category(&self, category: ActivityType) -> Result<Vec<Session>> {
    self
      .store
      .sessions_by_category(category)
      .await
      .map_err(Error::store)
  }

  /// Sessions that have ended strictly after `cutoff`. Sessions still
  /// running are never included.
  pub async fn list_ended_after(&self, cutoff: DateTime<Utc>) -> Result<Vec<Session>> {
    let mut sessions = self.list_all().await?;
    sessions.retain(|s| s.ended_after(cutoff));
    Ok(sessions)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Persist a new session.
  ///
  /// Fails with [`Error::IdentityConflict`] if `input.session_id` names a
  /// stored session, and with [`Error::InvalidReference`] if the owner does
  /// not exist.
  pub async fn create(&self, mut input: NewSession) -> Result<Session> {
    let requested = input.session_id;
    if let Some(id) = requested
      && self.store.session_exists(id).await.map_err(Error::store)?
    {
      return Err(taken(id));
    }

    let owner = resolve_owner(&self.profiles, input.owner_id).await?;
    input.owner_id = owner.profile_id;

    // A concurrent create may have claimed the id since the check above.
    let session = self
      .store
      .insert_session(input)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| taken(requested.unwrap_or_default()))?;
    tracing::info!(
      session_id = %session.session_id,
      owner_id = %session.owner_id,
      category = %session.category,
      "created session"
    );
    Ok(session)
  }

  /// Merge `patch` into the stored session and persist it.
  ///
  /// Fails with [`Error::NotFound`] if the session does not exist. The owner
  /// is always re-resolved: the patched owner if one is given, otherwise the
  /// current one. Either way a missing profile fails with
  /// [`Error::InvalidReference`].
  pub async fn update(&self, id: Uuid, patch: SessionPatch) -> Result<Session> {
    let existing = self.get(id).await?.ok_or(Error::NotFound(id))?;

    let mut merged = existing.clone();
    if !patch.merge_into(&mut merged) {
      tracing::debug!(session_id = %id, "session fields unchanged");
    }

    let owner_id = patch.owner_id.unwrap_or(existing.owner_id);
    let owner = resolve_owner(&self.profiles, owner_id).await?;
    merged.owner_id = owner.profile_id;

    let session = self
      .store
      .save_session(merged)
      .await
      .map_err(Error::store)?;
    let reassigned = session.owner_id != existing.owner_id;
    tracing::info!(
      session_id = %id,
      owner_id = %session.owner_id,
      reassigned,
      "updated session"
    );
    Ok(session)
  }
}

fn taken(id: Uuid) -> Error {
  Error::IdentityConflict(format!("session {id} already exists"))
}
