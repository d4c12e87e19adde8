//! SQL schema for the notebook SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Notes are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS notes (
    seq             INTEGER PRIMARY KEY AUTOINCREMENT,
    note_id         TEXT NOT NULL UNIQUE,
    notebook        TEXT NOT NULL,   -- grouping key; every read filters on it
    unit            TEXT NOT NULL,
    title           TEXT NOT NULL,
    description     TEXT NOT NULL,
    author_identity TEXT,
    author_email    TEXT,
    date            TEXT NOT NULL,   -- fixed-width RFC 3339 UTC; server-assigned
    lat             REAL,
    lon             REAL,
    CHECK ((author_identity IS NULL) = (author_email IS NULL)),
    CHECK ((lat IS NULL) = (lon IS NULL))
);

CREATE INDEX IF NOT EXISTS notes_notebook_date_idx ON notes(notebook, date);
CREATE INDEX IF NOT EXISTS notes_notebook_unit_idx ON notes(notebook, unit);

PRAGMA user_version = 1;
";
