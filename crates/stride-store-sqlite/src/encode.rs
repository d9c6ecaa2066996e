//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Instants are stored as RFC 3339 strings, calendar dates as day numbers
//! counted from 0001-01-01 (day 1). UUIDs are stored as hyphenated lowercase
//! strings.

use std::str::FromStr as _;

use chrono::{DateTime, Datelike as _, NaiveDate, Utc};
use rusqlite::types::Value;
use stride_core::{
  profile::Profile,
  session::{ActivityType, Session},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

/// An integer day number, so SQL comparisons follow calendar order for every
/// year chrono can represent, including negative and five-digit years.
pub fn encode_date(d: NaiveDate) -> i32 { d.num_days_from_ce() }

pub fn decode_date(days: i32) -> Result<NaiveDate> {
  NaiveDate::from_num_days_from_ce_opt(days)
    .ok_or_else(|| Error::DateParse(format!("day {days} is out of range")))
}

// ─── ActivityType
// ─────────────────────────────────────────────────────────────

pub fn encode_category(c: ActivityType) -> &'static str { c.as_str() }

pub fn decode_category(s: &str) -> Result<ActivityType> {
  ActivityType::from_str(s).map_err(|_| Error::UnknownCategory(s.to_owned()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawProfile::from_row`].
pub const PROFILE_COLUMNS: &str =
  "profile_id, first_name, last_name, birthdate, email";

/// Raw values read directly from a `profiles` row.
pub struct RawProfile {
  pub profile_id: String,
  pub first_name: String,
  pub last_name:  String,
  pub birthdate:  i32,
  pub email:      String,
}

impl RawProfile {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      profile_id: row.get(0)?,
      first_name: row.get(1)?,
      last_name:  row.get(2)?,
      birthdate:  row.get(3)?,
      email:      row.get(4)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      profile_id: decode_uuid(&self.profile_id)?,
      first_name: self.first_name,
      last_name:  self.last_name,
      birthdate:  decode_date(self.birthdate)?,
      email:      self.email,
    })
  }
}

/// Column list matching [`RawSession::from_row`].
pub const SESSION_COLUMNS: &str = "session_id, owner_id, start_time, end_time, \
                                   category, distance, average_speed";

/// Column values for a `sessions` row, in [`SESSION_COLUMNS`] order.
pub fn session_values(session: &Session) -> [Value; 7] {
  [
    encode_uuid(session.session_id).into(),
    encode_uuid(session.owner_id).into(),
    encode_dt(session.start_time).into(),
    session.end_time.map(encode_dt).into(),
    encode_category(session.category).to_owned().into(),
    session.distance.into(),
    session.average_speed.into(),
  ]
}

/// Raw values read directly from a `sessions` row.
pub struct RawSession {
  pub session_id:    String,
  pub owner_id:      String,
  pub start_time:    String,
  pub end_time:      Option<String>,
  pub category:      String,
  pub distance:      f64,
  pub average_speed: f64,
}

impl RawSession {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      session_id:    row.get(0)?,
      owner_id:      row.get(1)?,
      start_time:    row.get(2)?,
      end_time:      row.get(3)?,
      category:      row.get(4)?,
      distance:      row.get(5)?,
      average_speed: row.get(6)?,
    })
  }

  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      session_id:    decode_uuid(&self.session_id)?,
      owner_id:      decode_uuid(&self.owner_id)?,
      start_time:    decode_dt(&self.start_time)?,
      end_time:      self.end_time.as_deref().map(decode_dt).transpose()?,
      category:      decode_category(&self.category)?,
      distance:      self.distance,
      average_speed: self.average_speed,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_order_numerically_across_year_widths() {
    let dates = [
      NaiveDate::from_ymd_opt(-1, 12, 31).unwrap(),
      NaiveDate::from_ymd_opt(999, 12, 31).unwrap(),
      NaiveDate::from_ymd_opt(9999, 12, 31).unwrap(),
      NaiveDate::from_ymd_opt(10000, 1, 1).unwrap(),
    ];
    for pair in dates.windows(2) {
      assert!(encode_date(pair[0]) < encode_date(pair[1]));
    }
    for d in dates {
      assert_eq!(decode_date(encode_date(d)).unwrap(), d);
    }
  }

  #[test]
  fn unknown_category_is_rejected() {
    assert!(matches!(
      decode_category("ROWING"),
      Err(Error::UnknownCategory(s)) if s == "ROWING"
    ));
    assert_eq!(decode_category("TENNIS").unwrap(), ActivityType::Tennis);
  }

  #[test]
  fn malformed_date_is_a_parse_error() {
    assert!(matches!(decode_date(i32::MAX), Err(Error::DateParse(_))));
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
