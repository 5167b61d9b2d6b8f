//! Storage module for persisting client state
//!
//! This module handles everything that must survive a restart:
//! - The `KeyValueStore` capability and its SQLite and in-memory backends
//! - The bounded check history (`checkHistory`)
//! - The single-slot last-result cache (`lastCheckResult`)

mod cache;
mod history;
mod memory;
mod schema;
mod sqlite;
mod traits;

pub use cache::{ResultCache, CACHE_KEY};
pub use history::{relative_age, truncate_url, HistoryStore, HISTORY_CAPACITY, HISTORY_KEY};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{KeyValueStore, StorageError, StorageResult};

use std::path::Path;
use std::sync::Arc;

/// Opens the SQLite store at `path`, or an in-memory store when `ephemeral` is set
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
/// * `ephemeral` - Keep state in memory only
///
/// # Returns
///
/// * `Ok(Arc<dyn KeyValueStore>)` - Ready-to-share store
/// * `Err(StorageError)` - Failed to open the database
pub fn open_store(path: &Path, ephemeral: bool) -> StorageResult<Arc<dyn KeyValueStore>> {
    if ephemeral {
        tracing::debug!("Using in-memory state store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    tracing::debug!("Opening state store at {}", path.display());
    Ok(Arc::new(SqliteStore::new(path)?))
}
