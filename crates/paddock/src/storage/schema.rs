//! `SQLite` schema definitions for paddock.
//!
//! Every collection is a table of JSON documents keyed by document id. The
//! owning championship is kept in its own column so per-championship reads
//! do not have to parse every document.

/// SQL statement to create the championships collection.
pub const CREATE_CHAMPIONSHIPS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS championships (
    id TEXT PRIMARY KEY NOT NULL,
    championship_id TEXT,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the teams collection.
pub const CREATE_TEAMS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS teams (
    id TEXT PRIMARY KEY NOT NULL,
    championship_id TEXT,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the tracks collection.
pub const CREATE_TRACKS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS tracks (
    id TEXT PRIMARY KEY NOT NULL,
    championship_id TEXT,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the events collection.
pub const CREATE_EVENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS events (
    id TEXT PRIMARY KEY NOT NULL,
    championship_id TEXT,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to index teams by championship.
pub const CREATE_TEAMS_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_teams_championship ON teams(championship_id)
";

/// SQL statement to index tracks by championship.
pub const CREATE_TRACKS_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_tracks_championship ON tracks(championship_id)
";

/// SQL statement to index events by championship.
pub const CREATE_EVENTS_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_events_championship ON events(championship_id)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_CHAMPIONSHIPS_TABLE,
    CREATE_TEAMS_TABLE,
    CREATE_TRACKS_TABLE,
    CREATE_EVENTS_TABLE,
    CREATE_TEAMS_INDEX,
    CREATE_TRACKS_INDEX,
    CREATE_EVENTS_INDEX,
    CREATE_METADATA_TABLE,
];
