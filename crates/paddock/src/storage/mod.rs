//! Storage layer for paddock.
//!
//! This module provides a `SQLite`-backed document store for league data.
//! Each collection holds JSON documents keyed by a generated id, with the
//! owning championship indexed alongside.

pub mod document;
pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

pub use document::{generate_id, Collection, Document};

/// Document store for league data.
///
/// The handle is created once by the application and passed to whatever
/// needs it. The connection is guarded by a mutex so the handle can be
/// shared across tasks.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("storage connection lock poisoned"))
    }

    /// Insert a new document.
    ///
    /// An id is generated when the document has none. Returns the id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is already taken or the write fails.
    pub fn insert<D: Document>(&self, doc: &mut D) -> Result<String> {
        if doc.id().is_empty() {
            doc.set_id(generate_id(D::COLLECTION));
        }
        let body = serde_json::to_string(doc)?;
        let table = D::COLLECTION.table();

        self.conn()?.execute(
            &format!("INSERT INTO {table} (id, championship_id, body) VALUES (?1, ?2, ?3)"),
            params![doc.id(), doc.championship_id(), body],
        )?;

        debug!("Inserted {} {}", D::COLLECTION.kind(), doc.id());
        Ok(doc.id().to_string())
    }

    /// Insert a document or replace the one with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert<D: Document>(&self, doc: &mut D) -> Result<String> {
        if doc.id().is_empty() {
            doc.set_id(generate_id(D::COLLECTION));
        }
        let body = serde_json::to_string(doc)?;
        let table = D::COLLECTION.table();

        self.conn()?.execute(
            &format!(
                r"
                INSERT INTO {table} (id, championship_id, body) VALUES (?1, ?2, ?3)
                ON CONFLICT(id) DO UPDATE SET
                    championship_id = excluded.championship_id,
                    body = excluded.body,
                    updated_at = datetime('now')
                "
            ),
            params![doc.id(), doc.championship_id(), body],
        )?;

        Ok(doc.id().to_string())
    }

    /// Replace an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no document has this id, or an error
    /// if the write fails.
    pub fn update<D: Document>(&self, doc: &D) -> Result<()> {
        let body = serde_json::to_string(doc)?;
        let table = D::COLLECTION.table();

        let affected = self.conn()?.execute(
            &format!(
                "UPDATE {table} SET championship_id = ?2, body = ?3, updated_at = datetime('now') WHERE id = ?1"
            ),
            params![doc.id(), doc.championship_id(), body],
        )?;

        if affected == 0 {
            return Err(Error::not_found(D::COLLECTION.kind(), doc.id()));
        }
        debug!("Updated {} {}", D::COLLECTION.kind(), doc.id());
        Ok(())
    }

    /// Get a document by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored body cannot be read.
    pub fn get<D: Document>(&self, id: &str) -> Result<Option<D>> {
        let table = D::COLLECTION.table();
        let body: Option<String> = self
            .conn()?
            .query_row(
                &format!("SELECT body FROM {table} WHERE id = ?1"),
                [id],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|body| Self::decode(id, &body)).transpose()
    }

    /// Get a document by id, failing if it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no document has this id.
    pub fn require<D: Document>(&self, id: &str) -> Result<D> {
        self.get(id)?
            .ok_or_else(|| Error::not_found(D::COLLECTION.kind(), id))
    }

    /// All documents of a collection, in insertion order.
    ///
    /// Unreadable documents are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list<D: Document>(&self) -> Result<Vec<D>> {
        let table = D::COLLECTION.table();
        self.query_documents(&format!("SELECT id, body FROM {table} ORDER BY rowid"), [])
    }

    /// Documents belonging to a championship, in insertion order.
    ///
    /// Unreadable documents are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_for<D: Document>(&self, championship_id: &str) -> Result<Vec<D>> {
        let table = D::COLLECTION.table();
        self.query_documents(
            &format!("SELECT id, body FROM {table} WHERE championship_id = ?1 ORDER BY rowid"),
            [championship_id],
        )
    }

    /// Delete a document by id.
    ///
    /// Returns `true` if a document was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete<D: Document>(&self, id: &str) -> Result<bool> {
        let table = D::COLLECTION.table();
        let affected = self
            .conn()?
            .execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])?;
        if affected > 0 {
            info!("Deleted {} {}", D::COLLECTION.kind(), id);
        }
        Ok(affected > 0)
    }

    /// Count the documents in a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self, collection: Collection) -> Result<i64> {
        let table = collection.table();
        let count: i64 = self.conn()?.query_row(
            &format!("SELECT COUNT(*) FROM {table}"),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            championships: self.count(Collection::Championships)?,
            teams: self.count(Collection::Teams)?,
            tracks: self.count(Collection::Tracks)?,
            events: self.count(Collection::Events)?,
            db_size_bytes,
        })
    }

    /// Rewrite every stored document in canonical form.
    ///
    /// Returns the number of documents changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn normalize(&self) -> Result<usize> {
        migrations::normalize_documents(&*self.conn()?)
    }

    fn query_documents<D: Document, P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<D>> {
        let rows: Vec<(String, String)> = {
            let conn = self.conn()?;
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt
                .query_map(params, |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        };

        Ok(rows
            .into_iter()
            .filter_map(|(id, body)| match Self::decode::<D>(&id, &body) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    warn!("Skipping unreadable {} '{}': {}", D::COLLECTION.kind(), id, e);
                    None
                }
            })
            .collect())
    }

    /// Parse a stored body, taking the id from the row.
    fn decode<D: Document>(id: &str, body: &str) -> Result<D> {
        let mut doc: D = serde_json::from_str(body)?;
        doc.set_id(id.to_string());
        Ok(doc)
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of championships.
    pub championships: i64,
    /// Number of teams.
    pub teams: i64,
    /// Number of tracks.
    pub tracks: i64,
    /// Number of events.
    pub events: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

impl std::fmt::Display for StorageStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} championships, {} teams, {} tracks, {} events ({} KiB)",
            self.championships,
            self.teams,
            self.tracks,
            self.events,
            self.db_size_bytes / 1024
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_core::{Championship, Driver, Event, Team, Track};

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    fn create_championship(storage: &Storage) -> String {
        let mut championship = Championship::new("Winter Cup", "2025");
        storage.insert(&mut championship).unwrap()
    }

    #[test]
    fn test_open_in_memory() {
        assert!(Storage::open_in_memory().is_ok());
    }

    #[test]
    fn test_insert_assigns_id_and_get() {
        let storage = create_test_storage();
        let mut championship = Championship::new("Winter Cup", "2025");

        let id = storage.insert(&mut championship).unwrap();
        assert_eq!(id.len(), document::ID_LEN);
        assert_eq!(championship.id, id);

        let loaded: Championship = storage.get(&id).unwrap().unwrap();
        assert_eq!(loaded, championship);
    }

    #[test]
    fn test_insert_keeps_given_id() {
        let storage = create_test_storage();
        let mut team = Team::new("c1", "Red", "#f00", vec![Driver::new("A")]);
        team.id = "red-team".to_string();

        assert_eq!(storage.insert(&mut team).unwrap(), "red-team");
        assert!(storage.insert(&mut team).is_err());
    }

    #[test]
    fn test_get_nonexistent() {
        let storage = create_test_storage();
        let result: Option<Track> = storage.get("missing").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_require_not_found() {
        let storage = create_test_storage();
        let err = storage.require::<Event>("missing").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("event"));
    }

    #[test]
    fn test_list_for_filters_by_championship() {
        let storage = create_test_storage();
        let c1 = create_championship(&storage);
        let c2 = create_championship(&storage);

        for (champ, name) in [(&c1, "Monza"), (&c2, "Spa"), (&c1, "Imola")] {
            let mut track = Track::new(champ.as_str(), name, None, 1);
            storage.insert(&mut track).unwrap();
        }

        let tracks: Vec<Track> = storage.list_for(&c1).unwrap();
        let names: Vec<&str> = tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Monza", "Imola"]);
        assert!(tracks.iter().all(|t| !t.id.is_empty()));
    }

    #[test]
    fn test_list_skips_unreadable_documents() {
        let storage = create_test_storage();
        create_championship(&storage);
        storage
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO championships (id, body) VALUES ('broken', '{\"name\": 5}')",
                [],
            )
            .unwrap();

        let all: Vec<Championship> = storage.list().unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_update() {
        let storage = create_test_storage();
        let mut team = Team::new("c1", "Red", "#f00", vec![Driver::new("A")]);
        storage.insert(&mut team).unwrap();

        team.drivers.push(Driver::new("B"));
        storage.update(&team).unwrap();

        let loaded: Team = storage.require(&team.id).unwrap();
        assert_eq!(loaded.drivers.len(), 2);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let storage = create_test_storage();
        let mut team = Team::default();
        team.id = "ghost".to_string();
        assert!(storage.update(&team).unwrap_err().is_not_found());
    }

    #[test]
    fn test_upsert_inserts_then_replaces() {
        let storage = create_test_storage();
        let mut track = Track::new("c1", "Spa", None, 1);
        track.id = "spa".to_string();

        storage.upsert(&mut track).unwrap();
        track.round = 7;
        storage.upsert(&mut track).unwrap();

        assert_eq!(storage.count(Collection::Tracks).unwrap(), 1);
        assert_eq!(storage.require::<Track>("spa").unwrap().round, 7);
    }

    #[test]
    fn test_delete() {
        let storage = create_test_storage();
        let mut event = Event {
            championship_id: "c1".to_string(),
            title: "Exhibition".to_string(),
            ..Event::default()
        };
        let id = storage.insert(&mut event).unwrap();

        assert!(storage.delete::<Event>(&id).unwrap());
        assert!(!storage.delete::<Event>(&id).unwrap());
        assert!(storage.get::<Event>(&id).unwrap().is_none());
    }

    #[test]
    fn test_stats() {
        let storage = create_test_storage();
        let c1 = create_championship(&storage);
        let mut team = Team::new(c1.as_str(), "Red", "#f00", vec![Driver::new("A")]);
        storage.insert(&mut team).unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.championships, 1);
        assert_eq!(stats.teams, 1);
        assert_eq!(stats.tracks, 0);
        assert_eq!(stats.events, 0);
        assert_eq!(stats.db_size_bytes, 0);
        assert_eq!(
            stats.to_string(),
            "1 championships, 1 teams, 0 tracks, 0 events (0 KiB)"
        );
    }

    #[test]
    fn test_normalize_rewrites_loaded_rows() {
        let storage = create_test_storage();
        storage
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO tracks (id, championship_id, body) VALUES ('t1', 'c1', ?1)",
                [r#"{"name":"Spa","round":1,"points":{"Ann":"25"}}"#],
            )
            .unwrap();

        assert_eq!(storage.normalize().unwrap(), 1);
        assert_eq!(storage.normalize().unwrap(), 0);
        let track: Track = storage.require("t1").unwrap();
        assert_eq!(track.points.get("Ann"), 25);
    }

    #[test]
    fn test_path() {
        let storage = create_test_storage();
        assert_eq!(storage.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_open_file_based() {
        let db_path =
            std::env::temp_dir().join(format!("paddock_test_{}.db", std::process::id()));

        let storage = Storage::open(&db_path).unwrap();
        create_championship(&storage);
        assert_eq!(storage.count(Collection::Championships).unwrap(), 1);
        assert_eq!(storage.path(), db_path);
        assert!(storage.stats().unwrap().db_size_bytes > 0);

        drop(storage);
        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let root = std::env::temp_dir().join(format!("paddock_test_dirs_{}", std::process::id()));
        let nested_path = root.join("nested/league.db");
        let _ = std::fs::remove_dir_all(&root);

        let storage = Storage::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(storage);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_unicode_names_roundtrip() {
        let storage = create_test_storage();
        let mut track = Track::new("c1", "Autódromo José Carlos Pace", None, 3);
        track.points.insert("Jérôme Ñúñez", 18);
        let id = storage.insert(&mut track).unwrap();

        let loaded: Track = storage.require(&id).unwrap();
        assert_eq!(loaded.points.get("Jérôme Ñúñez"), 18);
    }
}
