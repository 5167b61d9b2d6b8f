//! Single-slot cache of the last displayed result
//!
//! Lets a restarted process show the same result it showed before.

use crate::model::CheckResult;
use crate::storage::traits::{KeyValueStore, StorageResult};
use std::sync::Arc;

/// Key the last result is persisted under
pub const CACHE_KEY: &str = "lastCheckResult";

#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn KeyValueStore>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Replaces the cached result
    pub fn save(&self, result: &CheckResult) -> StorageResult<()> {
        let blob = serde_json::to_string(result)?;
        self.store.set(CACHE_KEY, &blob)
    }

    /// Returns the cached result; absent, unreadable and corrupt slots all yield `None`
    pub fn load(&self) -> Option<CheckResult> {
        let blob = match self.store.get(CACHE_KEY) {
            Ok(blob) => blob?,
            Err(e) => {
                tracing::warn!("Failed to read cached result: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&blob) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!("Discarding corrupt cached result: {}", e);
                None
            }
        }
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove(CACHE_KEY)
    }
}
