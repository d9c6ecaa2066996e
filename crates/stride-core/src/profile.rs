//! Profiles: the people who log sessions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Profile ─────────────────────────────────────────────────────────────────

/// A stored person profile. `profile_id` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub profile_id: Uuid,
  pub first_name: String,
  pub last_name:  String,
  pub birthdate:  NaiveDate,
  /// Unique across profiles at creation time; compared case-sensitively.
  pub email:      String,
}

impl Profile {
  /// "First Last", as shown in summary listings.
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }

  /// Apply every field present in `patch`, leaving absent ones untouched.
  /// Returns `true` if anything changed.
  pub fn apply(&mut self, patch: ProfilePatch) -> bool {
    let mut changed = false;
    if let Some(first_name) = patch.first_name {
      changed |= first_name != self.first_name;
      self.first_name = first_name;
    }
    if let Some(last_name) = patch.last_name {
      changed |= last_name != self.last_name;
      self.last_name = last_name;
    }
    if let Some(birthdate) = patch.birthdate {
      changed |= birthdate != self.birthdate;
      self.birthdate = birthdate;
    }
    if let Some(email) = patch.email {
      changed |= email != self.email;
      self.email = email;
    }
    changed
  }
}

// ─── NewProfile ──────────────────────────────────────────────────────────────

/// Input to [`crate::ProfileService::create`].
///
/// Identities are assigned by the store. `id` exists so that a caller
/// round-tripping an already-stored record can be rejected rather than
/// silently re-inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfile {
  #[serde(default)]
  pub id:         Option<Uuid>,
  pub first_name: String,
  pub last_name:  String,
  pub birthdate:  NaiveDate,
  pub email:      String,
}

impl NewProfile {
  pub fn new(
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    birthdate: NaiveDate,
    email: impl Into<String>,
  ) -> Self {
    Self {
      id: None,
      first_name: first_name.into(),
      last_name: last_name.into(),
      birthdate,
      email: email.into(),
    }
  }

  /// Attach the store-assigned identity.
  pub fn into_profile(self, profile_id: Uuid) -> Profile {
    Profile {
      profile_id,
      first_name: self.first_name,
      last_name:  self.last_name,
      birthdate:  self.birthdate,
      email:      self.email,
    }
  }
}

// ─── ProfilePatch ────────────────────────────────────────────────────────────

/// A partial update. `None` means "leave the stored value alone".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub birthdate:  Option<NaiveDate>,
  pub email:      Option<String>,
}

// ─── ProfileSummary ──────────────────────────────────────────────────────────

/// A compact `{id, name}` read model for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
  pub profile_id: Uuid,
  pub name:       String,
}

impl ProfileSummary {
  /// Summary labelled with the full name.
  pub fn named(profile: &Profile) -> Self {
    Self { profile_id: profile.profile_id, name: profile.full_name() }
  }

  /// Summary labelled with the email address; used by email search.
  pub fn by_email(profile: &Profile) -> Self {
    Self { profile_id: profile.profile_id, name: profile.email.clone() }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn jane() -> Profile {
    NewProfile::new(
      "Jane",
      "Doe",
      NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
      "jane@x.io",
    )
    .into_profile(Uuid::new_v4())
  }

  #[test]
  fn apply_single_field_leaves_rest_untouched() {
    let before = jane();
    let mut after = before.clone();

    let changed = after.apply(ProfilePatch {
      first_name: Some("X".into()),
      ..Default::default()
    });

    assert!(changed);
    assert_eq!(after.first_name, "X");
    assert_eq!(after.last_name, before.last_name);
    assert_eq!(after.birthdate, before.birthdate);
    assert_eq!(after.email, before.email);
    assert_eq!(after.profile_id, before.profile_id);
  }

  #[test]
  fn apply_empty_patch_is_noop() {
    let before = jane();
    let mut after = before.clone();
    assert!(!after.apply(ProfilePatch::default()));
    assert_eq!(after, before);
  }

  #[test]
  fn apply_same_value_reports_unchanged() {
    let mut p = jane();
    let changed = p.apply(ProfilePatch {
      email: Some("jane@x.io".into()),
      ..Default::default()
    });
    assert!(!changed);
  }

  #[test]
  fn summaries() {
    let p = jane();
    assert_eq!(ProfileSummary::named(&p).name, "Jane Doe");
    assert_eq!(ProfileSummary::by_email(&p).name, "jane@x.io");
  }

  #[test]
  fn new_profile_deserialises_without_id() {
    let json = r#"{
      "first_name": "Jane",
      "last_name": "Doe",
      "birthdate": "1990-01-01",
      "email": "jane@x.io"
    }"#;
    let np: NewProfile = serde_json::from_str(json).unwrap();
    assert!(np.id.is_none());
    assert_eq!(np.birthdate, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
  }
}
