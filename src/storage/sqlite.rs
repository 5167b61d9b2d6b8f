//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the KeyValueStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{KeyValueStore, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// SQLite storage backend
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Creates a new SqliteStore instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let conn = self.conn();
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn().execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.conn()
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }
}
