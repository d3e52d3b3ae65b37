//! SQL schema for the SQLite patient store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS patients (
    patient_id  TEXT PRIMARY KEY,   -- hyphenated lowercase UUID
    name        TEXT NOT NULL,
    phone       TEXT NOT NULL,
    email       TEXT NOT NULL,
    birth_date  TEXT NOT NULL,      -- ISO 8601 date (YYYY-MM-DD)
    active      INTEGER NOT NULL DEFAULT 1,
    created_at  INTEGER NOT NULL,   -- milliseconds since epoch
    updated_at  INTEGER NOT NULL
);

PRAGMA user_version = 1;
";
