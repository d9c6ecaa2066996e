//! The profile registry and the two capabilities it provides.
//!
//! [`ProfileLookup`] is the read-only side; it is all a
//! [`SessionLog`](crate::SessionLog) needs to validate owners.
//! [`ProfileService`] adds the mutating operations. [`ProfileRegistry`]
//! implements both over any [`ProfileStore`].

use std::{future::Future, sync::Arc};

use chrono::{Months, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  Error, Result,
  profile::{NewProfile, Profile, ProfilePatch, ProfileSummary},
  store::ProfileStore,
};

// ─── Capabilities ────────────────────────────────────────────────────────────

/// Read-only access to profiles.
pub trait ProfileLookup: Send + Sync {
  /// Returns `None` if no profile has this id.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>>> + Send + '_;

  /// Exact, case-sensitive match.
  fn get_by_email(
    &self,
    email: &str,
  ) -> impl Future<Output = Result<Option<Profile>>> + Send;

  fn list_all(&self) -> impl Future<Output = Result<Vec<Profile>>> + Send + '_;

  /// `{id, "First Last"}` for every profile.
  fn list_summaries(
    &self,
  ) -> impl Future<Output = Result<Vec<ProfileSummary>>> + Send + '_;

  /// Case-insensitive substring match on email.
  fn search_by_email_fragment(
    &self,
    fragment: &str,
  ) -> impl Future<Output = Result<Vec<Profile>>> + Send;

  /// Profiles born strictly before `today` minus `age` years.
  fn older_than_on(
    &self,
    age: u32,
    today: NaiveDate,
  ) -> impl Future<Output = Result<Vec<Profile>>> + Send + '_;

  /// [`older_than_on`](Self::older_than_on) relative to the current UTC date.
  fn older_than(
    &self,
    age: u32,
  ) -> impl Future<Output = Result<Vec<Profile>>> + Send + '_ {
    self.older_than_on(age, Utc::now().date_naive())
  }
}

/// Mutating operations on profiles.
pub trait ProfileService: ProfileLookup {
  /// Fails with [`Error::IdentityConflict`] if `input.id` is set and with
  /// [`Error::DuplicateEmail`] if the email is already taken.
  fn create(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<Profile>> + Send + '_;

  /// Merge `patch` into the stored profile. Fails with [`Error::NotFound`]
  /// if there is no such profile.
  ///
  /// The email is not re-checked for uniqueness here, so two profiles can
  /// end up sharing one through updates.
  fn update(
    &self,
    id: Uuid,
    patch: ProfilePatch,
  ) -> impl Future<Output = Result<Profile>> + Send + '_;

  /// Returns `true` if a profile was removed, `false` if none existed.
  fn delete(&self, id: Uuid) -> impl Future<Output = Result<bool>> + Send + '_;
}

/// The birthdate cutoff for "older than `age` years" as of `today`.
///
/// February 29 clamps to February 28 in non-leap years.
pub fn age_cutoff(age: u32, today: NaiveDate) -> NaiveDate {
  today
    .checked_sub_months(Months::new(age.saturating_mul(12)))
    .unwrap_or(NaiveDate::MIN)
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// Owns the profile lifecycle on top of a [`ProfileStore`].
///
/// Cloning is cheap; the store is reference-counted.
pub struct ProfileRegistry<S> {
  store: Arc<S>,
}

impl<S> Clone for ProfileRegistry<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: ProfileStore> ProfileRegistry<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }
}

impl<S: ProfileStore> ProfileLookup for ProfileRegistry<S> {
  async fn get(&self, id: Uuid) -> Result<Option<Profile>> {
    self.store.find_profile(id).await.map_err(Error::store)
  }

  async fn get_by_email(&self, email: &str) -> Result<Option<Profile>> {
    self
      .store
      .find_profile_by_email(email)
      .await
      .map_err(Error::store)
  }

  async fn list_all(&self) -> Result<Vec<Profile>> {
    self.store.list_profiles().await.map_err(Error::store)
  }

  async fn list_summaries(&self) -> Result<Vec<ProfileSummary>> {
    let profiles = self.list_all().await?;
    Ok(profiles.iter().map(ProfileSummary::named).collect())
  }

  async fn search_by_email_fragment(&self, fragment: &str) -> Result<Vec<Profile>> {
    self
      .store
      .search_profiles_by_email(fragment)
      .await
      .map_err(Error::store)
  }

  async fn older_than_on(&self, age: u32, today: NaiveDate) -> Result<Vec<Profile>> {
    let cutoff = age_cutoff(age, today);
    self
      .store
      .profiles_born_before(cutoff)
      .await
      .map_err(Error::store)
  }
}

impl<S: ProfileStore> ProfileService for ProfileRegistry<S> {
  async fn create(&self, input: NewProfile) -> Result<Profile> {
    if let Some(id) = input.id {
      return Err(Error::IdentityConflict(format!(
        "profile already has id {id}; ids are assigned by the store"
      )));
    }

    if self.get_by_email(&input.email).await?.is_some() {
      return Err(Error::DuplicateEmail(input.email));
    }

    let profile = self
      .store
      .insert_profile(input)
      .await
      .map_err(Error::store)?;
    tracing::info!(profile_id = %profile.profile_id, "created profile");
    Ok(profile)
  }

  async fn update(&self, id: Uuid, patch: ProfilePatch) -> Result<Profile> {
    let mut profile = self.get(id).await?.ok_or(Error::NotFound(id))?;

    if !profile.apply(patch) {
      tracing::debug!(profile_id = %id, "profile update changed nothing");
    }

    let profile = self
      .store
      .save_profile(profile)
      .await
      .map_err(Error::store)?;
    tracing::info!(profile_id = %id, "updated profile");
    Ok(profile)
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    if !self.store.profile_exists(id).await.map_err(Error::store)? {
      return Ok(false);
    }
    self.store.delete_profile(id).await.map_err(Error::store)?;
    tracing::info!(profile_id = %id, "deleted profile");
    Ok(true)
  }
}
