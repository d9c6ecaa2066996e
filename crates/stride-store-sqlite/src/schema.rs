//! SQL schema for the Stride SQLite store.
//!
//! Executed once at connection startup. Migrations are out of scope; the
//! `user_version` pragma records which layout a file was created with.
//! Version 2 stores `birthdate` as an integer day number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Email is deliberately not UNIQUE: uniqueness is enforced on create only.
CREATE TABLE IF NOT EXISTS profiles (
    profile_id  TEXT PRIMARY KEY,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    birthdate   INTEGER NOT NULL, -- days since 0000-12-31
    email       TEXT NOT NULL
);

-- owner_id is checked by the session log before every write, not by a
-- foreign key, so deleting a profile never fails on its sessions.
CREATE TABLE IF NOT EXISTS sessions (
    session_id     TEXT PRIMARY KEY,
    owner_id       TEXT NOT NULL,
    start_time     TEXT NOT NULL,   -- RFC 3339 UTC
    end_time       TEXT,            -- RFC 3339 UTC or NULL while running
    category       TEXT NOT NULL,   -- 'RUNNING' | 'CYCLING' | ...
    distance       REAL NOT NULL,
    average_speed  REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS profiles_email_idx     ON profiles(email);
CREATE INDEX IF NOT EXISTS profiles_birthdate_idx ON profiles(birthdate);
CREATE INDEX IF NOT EXISTS sessions_owner_idx     ON sessions(owner_id);
CREATE INDEX IF NOT EXISTS sessions_category_idx  ON sessions(category);

PRAGMA user_version = 2;
";
