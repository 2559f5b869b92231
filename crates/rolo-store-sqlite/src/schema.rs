//! SQL schema for the rolo SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS statuses (
    status_id  INTEGER PRIMARY KEY,
    name       TEXT NOT NULL UNIQUE
);

-- Deleting a status removes its contacts outright (hard cascade,
-- not nullification).
CREATE TABLE IF NOT EXISTS contacts (
    contact_id   INTEGER PRIMARY KEY,
    first_name   TEXT NOT NULL,
    last_name    TEXT NOT NULL,
    phone_number TEXT NOT NULL UNIQUE,
    email        TEXT NOT NULL UNIQUE,
    city         TEXT NOT NULL,
    status_id    INTEGER REFERENCES statuses(status_id) ON DELETE CASCADE,
    created_at   TEXT NOT NULL    -- ISO 8601 UTC; assigned once at insert
);

CREATE INDEX IF NOT EXISTS contacts_status_idx    ON contacts(status_id);
CREATE INDEX IF NOT EXISTS contacts_last_name_idx ON contacts(last_name);
CREATE INDEX IF NOT EXISTS contacts_created_idx   ON contacts(created_at);

PRAGMA user_version = 1;
";
