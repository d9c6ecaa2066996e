//! [`SqliteStore`]: the SQLite implementation of [`ProfileStore`] and
//! [`SessionStore`].

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{OptionalExtension as _, types::Value};
use uuid::Uuid;

use stride_core::{
  profile::{NewProfile, Profile},
  session::{ActivityType, NewSession, Session},
  store::{ProfileStore, SessionStore},
};

use crate::{
  Result,
  encode::{
    PROFILE_COLUMNS, RawProfile, RawSession, SESSION_COLUMNS, encode_category,
    encode_date, encode_uuid, session_values,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Stride store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `SELECT … FROM profiles {clause}` with at most one bound argument,
  /// in insertion order.
  async fn query_profiles(
    &self,
    clause: &'static str,
    arg: Option<Value>,
  ) -> Result<Vec<Profile>> {
    let raws: Vec<RawProfile> = self
      .conn
      .call(move |conn| {
        let sql =
          format!("SELECT {PROFILE_COLUMNS} FROM profiles {clause} ORDER BY rowid");
        let mut stmt = conn.prepare(&sql)?;
        let rows = match arg {
          Some(a) => stmt
            .query_map(rusqlite::params![a], RawProfile::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawProfile::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  /// Session counterpart of [`Self::query_profiles`].
  async fn query_sessions(
    &self,
    clause: &'static str,
    arg: Option<Value>,
  ) -> Result<Vec<Session>> {
    let raws: Vec<RawSession> = self
      .conn
      .call(move |conn| {
        let sql =
          format!("SELECT {SESSION_COLUMNS} FROM sessions {clause} ORDER BY rowid");
        let mut stmt = conn.prepare(&sql)?;
        let rows = match arg {
          Some(a) => stmt
            .query_map(rusqlite::params![a], RawSession::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawSession::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSession::into_session).collect()
  }

  async fn exists(&self, sql: &'static str, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(sql, rusqlite::params![id_str], |_| Ok(true))
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  async fn upsert_profile(&self, profile: &Profile) -> Result<()> {
    let id_str        = encode_uuid(profile.profile_id);
    let first_name    = profile.first_name.clone();
    let last_name     = profile.last_name.clone();
    let birthdate     = encode_date(profile.birthdate);
    let email         = profile.email.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (profile_id, first_name, last_name, birthdate, email)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (profile_id) DO UPDATE SET
             first_name = excluded.first_name,
             last_name  = excluded.last_name,
             birthdate  = excluded.birthdate,
             email      = excluded.email",
          rusqlite::params![id_str, first_name, last_name, birthdate, email],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn upsert_session(&self, session: &Session) -> Result<()> {
    let values = session_values(session);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO sessions ({SESSION_COLUMNS}) VALUES ({SESSION_SLOTS})
             ON CONFLICT (session_id) DO UPDATE SET
               owner_id      = excluded.owner_id,
               start_time    = excluded.start_time,
               end_time      = excluded.end_time,
               category      = excluded.category,
               distance      = excluded.distance,
               average_speed = excluded.average_speed"
          ),
          rusqlite::params_from_iter(values),
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Plain `INSERT`; returns `false` if the primary key is already taken.
  async fn insert_session_row(&self, session: &Session) -> Result<bool> {
    let values = session_values(session);
    let inserted = self
      .conn
      .call(move |conn| {
        let sql =
          format!("INSERT INTO sessions ({SESSION_COLUMNS}) VALUES ({SESSION_SLOTS})");
        match conn.execute(&sql, rusqlite::params_from_iter(values)) {
          Ok(_) => Ok(true),
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
          {
            Ok(false)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;
    Ok(inserted)
  }
}

const SESSION_SLOTS: &str = "?1, ?2, ?3, ?4, ?5, ?6, ?7";

// ─── ProfileStore impl ───────────────────────────────────────────────────────

impl ProfileStore for SqliteStore {
  type Error = crate::Error;

  async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>> {
    let mut found = self
      .query_profiles("WHERE profile_id = ?1", Some(encode_uuid(id).into()))
      .await?;
    Ok(found.pop())
  }

  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    self.query_profiles("", None).await
  }

  async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>> {
    // `=` uses BINARY collation, so the match is case-sensitive. Emails are
    // not unique after updates; the earliest profile wins.
    let found = self
      .query_profiles("WHERE email = ?1", Some(email.to_owned().into()))
      .await?;
    Ok(found.into_iter().next())
  }

  async fn search_profiles_by_email(&self, fragment: &str) -> Result<Vec<Profile>> {
    // SQLite's lower() only folds ASCII, so case folding happens here.
    let needle = fragment.to_lowercase();
    let mut profiles = self.list_profiles().await?;
    profiles.retain(|p| p.email.to_lowercase().contains(&needle));
    Ok(profiles)
  }

  async fn profiles_born_before(&self, date: NaiveDate) -> Result<Vec<Profile>> {
    self
      .query_profiles("WHERE birthdate < ?1", Some(encode_date(date).into()))
      .await
  }

  async fn profile_exists(&self, id: Uuid) -> Result<bool> {
    self
      .exists("SELECT 1 FROM profiles WHERE profile_id = ?1", id)
      .await
  }

  async fn insert_profile(&self, input: NewProfile) -> Result<Profile> {
    let profile = input.into_profile(Uuid::new_v4());
    self.upsert_profile(&profile).await?;
    Ok(profile)
  }

  async fn save_profile(&self, profile: Profile) -> Result<Profile> {
    self.upsert_profile(&profile).await?;
    Ok(profile)
  }

  async fn delete_profile(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM profiles WHERE profile_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── SessionStore impl ───────────────────────────────────────────────────────

impl SessionStore for SqliteStore {
  type Error = crate::Error;

  async fn find_session(&self, id: Uuid) -> Result<Option<Session>> {
    let mut found = self
      .query_sessions("WHERE session_id = ?1", Some(encode_uuid(id).into()))
      .await?;
    Ok(found.pop())
  }

  async fn list_sessions(&self) -> Result<Vec<Session>> {
    self.query_sessions("", None).await
  }

  async fn sessions_by_owner(&self, owner_id: Uuid) -> Result<Vec<Session>> {
    self
      .query_sessions("WHERE owner_id = ?1", Some(encode_uuid(owner_id).into()))
      .await
  }

  async fn sessions_by_category(&self, category: ActivityType) -> Result<Vec<Session>> {
    self
      .query_sessions(
        "WHERE category = ?1",
        Some(encode_category(category).to_owned().into()),
      )
      .await
  }

  async fn session_exists(&self, id: Uuid) -> Result<bool> {
    self
      .exists("SELECT 1 FROM sessions WHERE session_id = ?1", id)
      .await
  }

  async fn insert_session(&self, input: NewSession) -> Result<Option<Session>> {
    let session_id = input.session_id.unwrap_or_else(Uuid::new_v4);
    let session = input.into_session(session_id);
    Ok(self.insert_session_row(&session).await?.then_some(session))
  }

  async fn save_session(&self, session: Session) -> Result<Session> {
    self.upsert_session(&session).await?;
    Ok(session)
  }
}
