//! Storage traits and error types
//!
//! This module defines the key-value interface persisted state is written
//! through, and the associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// String-keyed persistence capability
///
/// Implementations must be usable from several tasks at once; the history
/// store and the result cache share one backend.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, if any
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
