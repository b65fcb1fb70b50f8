//! SQLite schema definitions and SQL query constants.
//!
//! This module contains all SQL statements used by the SQLite repository,
//! following the Functional Core pattern - pure data, no I/O.

/// Enables foreign key enforcement. SQLite keeps it off per connection by default.
pub const ENABLE_FOREIGN_KEYS: &str = "PRAGMA foreign_keys = ON;";

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Events table
CREATE TABLE IF NOT EXISTS events (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    location TEXT,
    start_at TEXT NOT NULL,
    end_at TEXT NOT NULL,
    repeat_rule TEXT NOT NULL
);

-- Expanded occurrences, one row per concrete interval
CREATE TABLE IF NOT EXISTS occurrences (
    event_id TEXT NOT NULL,
    start_at TEXT NOT NULL,
    end_at TEXT NOT NULL,
    FOREIGN KEY (event_id) REFERENCES events(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_occurrences_event_id ON occurrences(event_id);
"#;

// Event queries
pub const INSERT_EVENT: &str = r#"
INSERT INTO events (id, title, description, location, start_at, end_at, repeat_rule)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_EVENT_BY_ID: &str = r#"
SELECT id, title, description, location, start_at, end_at, repeat_rule
FROM events
WHERE id = ?1
"#;

pub const SELECT_ALL_EVENTS: &str = r#"
SELECT id, title, description, location, start_at, end_at, repeat_rule
FROM events
ORDER BY start_at ASC, id ASC
"#;

pub const UPDATE_EVENT: &str = r#"
UPDATE events
SET title = ?2, description = ?3, location = ?4, start_at = ?5, end_at = ?6, repeat_rule = ?7
WHERE id = ?1
"#;

pub const DELETE_EVENT: &str = r#"
DELETE FROM events
WHERE id = ?1
"#;

// Occurrence queries
pub const INSERT_OCCURRENCE: &str = r#"
INSERT INTO occurrences (event_id, start_at, end_at)
VALUES (?1, ?2, ?3)
"#;

pub const SELECT_OCCURRENCES_BY_EVENT: &str = r#"
SELECT event_id, start_at, end_at
FROM occurrences
WHERE event_id = ?1
ORDER BY start_at ASC, end_at ASC
"#;

pub const SELECT_ALL_OCCURRENCES: &str = r#"
SELECT event_id, start_at, end_at
FROM occurrences
ORDER BY start_at ASC, end_at ASC
"#;

pub const DELETE_OCCURRENCES_BY_EVENT: &str = r#"
DELETE FROM occurrences
WHERE event_id = ?1
"#;
