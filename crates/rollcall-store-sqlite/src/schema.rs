//! SQL schema for the Rollcall SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per surrogate identity ever observed. Rows are never deleted;
-- a departure only sets the tombstone flag.
CREATE TABLE IF NOT EXISTS entries (
    entry_id      TEXT PRIMARY KEY,
    dn            TEXT NOT NULL,
    display_name  TEXT NOT NULL,
    title         TEXT NOT NULL,
    department    TEXT NOT NULL,
    location      TEXT,
    email         TEXT,
    employee_id   TEXT,
    hire_date     TEXT,            -- ISO 8601 calendar date or NULL
    created_at    TEXT NOT NULL,   -- RFC 3339 UTC; immutable after insert
    updated_at    TEXT NOT NULL,   -- RFC 3339 UTC; advanced per observation
    departed      INTEGER NOT NULL DEFAULT 0,
    superseded_by TEXT REFERENCES entries(entry_id)
);

-- Exactly one live row per distinguished name. Tombstones keep their dn,
-- so a departed identity's name may be reused by a later identity.
CREATE UNIQUE INDEX IF NOT EXISTS entries_live_dn_idx
    ON entries(dn) WHERE departed = 0;

CREATE INDEX IF NOT EXISTS entries_updated_idx ON entries(updated_at);

PRAGMA user_version = 1;
";
