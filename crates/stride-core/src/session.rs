//! Sessions: logged exercise sessions, each owned by a profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

// ─── ActivityType ────────────────────────────────────────────────────────────

/// The kind of exercise a session records.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
  Running,
  Cycling,
  Walking,
  Swimming,
  Tennis,
}

impl ActivityType {
  /// The discriminant string stored in the `category` column.
  pub fn as_str(self) -> &'static str { self.into() }
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// A stored session. `owner_id` always names an existing profile at the time
/// the session was last written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
  pub session_id:    Uuid,
  pub owner_id:      Uuid,
  pub start_time:    DateTime<Utc>,
  /// `None` while the session is still running.
  pub end_time:      Option<DateTime<Utc>>,
  pub category:      ActivityType,
  pub distance:      f64,
  pub average_speed: f64,
}

impl Session {
  /// `true` if the session has ended strictly after `cutoff`.
  pub fn ended_after(&self, cutoff: DateTime<Utc>) -> bool {
    self.end_time.is_some_and(|end| end > cutoff)
  }
}

// ─── NewSession ──────────────────────────────────────────────────────────────

/// Input to [`crate::SessionLog::create`].
///
/// Unlike profiles, a session may arrive with a caller-chosen `session_id`.
/// It is honoured when free and rejected when already taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
  #[serde(default)]
  pub session_id:    Option<Uuid>,
  pub owner_id:      Uuid,
  pub start_time:    DateTime<Utc>,
  pub end_time:      Option<DateTime<Utc>>,
  pub category:      ActivityType,
  pub distance:      f64,
  pub average_speed: f64,
}

impl NewSession {
  /// Attach the final identity.
  pub fn into_session(self, session_id: Uuid) -> Session {
    Session {
      session_id,
      owner_id:      self.owner_id,
      start_time:    self.start_time,
      end_time:      self.end_time,
      category:      self.category,
      distance:      self.distance,
      average_speed: self.average_speed,
    }
  }
}

// ─── SessionPatch ────────────────────────────────────────────────────────────

/// A partial update to a session.
///
/// The owner is not merged here: it is always re-resolved against the profile
/// store by [`crate::SessionLog::update`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionPatch {
  pub owner_id:   Option<Uuid>,
  pub start_time: Option<DateTime<Utc>>,
  pub end_time:   Option<DateTime<Utc>>,
  pub category:   Option<ActivityType>,
  /// Only positive values are applied; `Some(0.0)` is treated as "no change".
  pub distance:   Option<f64>,
}

impl SessionPatch {
  /// Merge the non-owner fields into `session`. A field is replaced only if
  /// the patch supplies a value that differs from the stored one.
  ///
  /// Returns `true` if anything changed.
  pub fn merge_into(&self, session: &mut Session) -> bool {
    let mut changed = false;

    if let Some(distance) = self.distance
      && distance > 0.0
      && distance != session.distance
    {
      session.distance = distance;
      changed = true;
    }

    if let Some(end) = self.end_time
      && session.end_time != Some(end)
    {
      session.end_time = Some(end);
      changed = true;
    }

    if let Some(start) = self.start_time
      && start != session.start_time
    {
      session.start_time = start;
      changed = true;
    }

    if let Some(category) = self.category
      && category != session.category
    {
      session.category = category;
      changed = true;
    }

    changed
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr as _;

  use chrono::{Duration, TimeZone as _};
  use strum::IntoEnumIterator as _;

  use super::*;

  fn t0() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap() }

  fn run() -> Session {
    Session {
      session_id:    Uuid::new_v4(),
      owner_id:      Uuid::new_v4(),
      start_time:    t0(),
      end_time:      Some(t0() + Duration::hours(1)),
      category:      ActivityType::Running,
      distance:      5.0,
      average_speed: 5.0,
    }
  }

  #[test]
  fn activity_type_string_forms() {
    for kind in ActivityType::iter() {
      assert_eq!(ActivityType::from_str(kind.as_str()).unwrap(), kind);
      let json = serde_json::to_string(&kind).unwrap();
      assert_eq!(json, format!("\"{kind}\""));
    }
    assert_eq!(ActivityType::Running.as_str(), "RUNNING");
    assert!(ActivityType::from_str("running").is_err());
  }

  #[test]
  fn zero_distance_is_not_applied() {
    let mut s = run();
    let patch = SessionPatch { distance: Some(0.0), ..Default::default() };
    assert!(!patch.merge_into(&mut s));
    assert_eq!(s.distance, 5.0);
  }

  #[test]
  fn negative_distance_is_not_applied() {
    let mut s = run();
    let patch = SessionPatch { distance: Some(-2.0), ..Default::default() };
    assert!(!patch.merge_into(&mut s));
    assert_eq!(s.distance, 5.0);
  }

  #[test]
  fn positive_distance_is_applied() {
    let mut s = run();
    let patch = SessionPatch { distance: Some(7.5), ..Default::default() };
    assert!(patch.merge_into(&mut s));
    assert_eq!(s.distance, 7.5);
  }

  #[test]
  fn same_values_report_unchanged() {
    let before = run();
    let mut s = before.clone();
    let patch = SessionPatch {
      start_time: Some(s.start_time),
      end_time: s.end_time,
      category: Some(s.category),
      distance: Some(s.distance),
      owner_id: None,
    };
    assert!(!patch.merge_into(&mut s));
    assert_eq!(s, before);
  }

  #[test]
  fn end_time_set_on_running_session() {
    let mut s = run();
    s.end_time = None;
    let end = t0() + Duration::minutes(45);
    let patch = SessionPatch { end_time: Some(end), ..Default::default() };
    assert!(patch.merge_into(&mut s));
    assert_eq!(s.end_time, Some(end));
  }

  #[test]
  fn merge_never_touches_owner() {
    let mut s = run();
    let owner = s.owner_id;
    let patch = SessionPatch {
      owner_id: Some(Uuid::new_v4()),
      category: Some(ActivityType::Cycling),
      ..Default::default()
    };
    patch.merge_into(&mut s);
    assert_eq!(s.owner_id, owner);
    assert_eq!(s.category, ActivityType::Cycling);
  }

  #[test]
  fn ended_after_is_strict() {
    let s = run();
    let end = s.end_time.unwrap();
    assert!(s.ended_after(end - Duration::seconds(1)));
    assert!(!s.ended_after(end));

    let mut open = run();
    open.end_time = None;
    assert!(!open.ended_after(t0() - Duration::days(365)));
  }
}
