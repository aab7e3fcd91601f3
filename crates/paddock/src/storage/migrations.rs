//! Database migration system for paddock.
//!
//! Version 1 is the base schema. Version 2 rewrites every stored document
//! through the model once, so older shapes (bare-name rosters, string
//! points, timestamped dates) are stored in canonical form afterwards.
//!
//! The same rewrite is exposed as [`normalize_documents`] for rows loaded
//! into an already current database, e.g. from a legacy dump.

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use paddock_core::{Championship, Event, Team, Track};

use crate::error::{Error, Result};

use super::document::{Collection, Document};
use super::schema::SCHEMA_STATEMENTS;

/// The current schema version.
pub const CURRENT_VERSION: i32 = 2;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Initialize the database schema.
///
/// Creates all tables and indexes if they don't exist, then runs any
/// pending migrations to bring the schema up to the current version.
///
/// # Errors
///
/// Returns an error if schema creation or migration fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let version = get_schema_version(conn)?;
    if version < CURRENT_VERSION {
        run_migrations(conn, version)?;
    }

    Ok(())
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (fresh database).
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let result: std::result::Result<String, rusqlite::Error> = conn.query_row(
        "SELECT value FROM metadata WHERE key = ?1",
        [VERSION_KEY],
        |row| row.get(0),
    );

    match result {
        Ok(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

/// Run migrations from the given version to the current version.
fn run_migrations(conn: &Connection, from_version: i32) -> Result<()> {
    let mut current = from_version;

    while current < CURRENT_VERSION {
        current += 1;
        run_migration(conn, current)?;
    }

    set_schema_version(conn, CURRENT_VERSION)?;
    Ok(())
}

/// Run a specific migration version.
fn run_migration(conn: &Connection, version: i32) -> Result<()> {
    match version {
        1 => migrate_v1(conn),
        2 => migrate_v2(conn),
        _ => Err(Error::DatabaseMigration {
            message: format!("unknown migration version: {version}"),
        }),
    }
}

/// Migration to version 1 (initial schema).
///
/// The tables already exist from `SCHEMA_STATEMENTS`.
fn migrate_v1(conn: &Connection) -> Result<()> {
    set_schema_version(conn, 1)?;
    Ok(())
}

/// Migration to version 2: store every document in canonical form.
fn migrate_v2(conn: &Connection) -> Result<()> {
    normalize_documents(conn)?;
    set_schema_version(conn, 2)?;
    Ok(())
}

/// Rewrite every stored document in canonical form.
///
/// Returns the number of documents whose stored body changed.
///
/// # Errors
///
/// Returns an error if a collection cannot be read or a row cannot be
/// written.
pub fn normalize_documents(conn: &Connection) -> Result<usize> {
    let rewritten = rewrite_documents::<Championship>(conn)?
        + rewrite_documents::<Team>(conn)?
        + rewrite_documents::<Track>(conn)?
        + rewrite_documents::<Event>(conn)?;

    if rewritten > 0 {
        info!("Normalized {} stored documents", rewritten);
    }
    Ok(rewritten)
}

/// Re-serialize each document of a collection through its model type.
///
/// Documents that no longer parse are left untouched.
fn rewrite_documents<D>(conn: &Connection) -> Result<usize>
where
    D: Document + Serialize + DeserializeOwned,
{
    let table = D::COLLECTION.table();
    let rows: Vec<(String, String)> = conn
        .prepare(&format!("SELECT id, body FROM {table}"))?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<_, _>>()?;

    let mut rewritten = 0;
    for (id, body) in rows {
        let canonical = match serde_json::from_str::<D>(&body) {
            Ok(doc) => serde_json::to_string(&doc)?,
            Err(e) => {
                warn!("Leaving unreadable {} '{}' as stored: {}", D::COLLECTION.kind(), id, e);
                continue;
            }
        };
        if canonical != body {
            conn.execute(
                &format!(
                    "UPDATE {table} SET body = ?1, updated_at = datetime('now') WHERE id = ?2"
                ),
                params![canonical, id],
            )?;
            rewritten += 1;
        }
    }
    Ok(rewritten)
}

/// Tables created for every collection.
#[must_use]
pub fn collection_tables() -> Vec<&'static str> {
    Collection::ALL.iter().map(|c| c.table()).collect()
}
