//! Owner resolution for sessions.

use uuid::Uuid;

use crate::{Error, Result, profile::Profile, registry::ProfileLookup};

/// Fetch the profile a session refers to.
///
/// Fails with [`Error::InvalidReference`] if no such profile exists. This is a
/// plain read: nothing stops the profile from being deleted between this call
/// and the session write that follows it.
pub async fn resolve_owner<L>(profiles: &L, owner_id: Uuid) -> Result<Profile>
where
  L: ProfileLookup,
{
  match profiles.get(owner_id).await? {
    Some(profile) => Ok(profile),
    None => {
      tracing::debug!(%owner_id, "owner does not resolve");
      Err(Error::InvalidReference(owner_id))
    }
  }
}
