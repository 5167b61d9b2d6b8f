//! Bounded check history
//!
//! The history is persisted as one JSON array under a single key and rewritten
//! as a whole on every mutation. Newest entries come first.

use crate::model::HistoryEntry;
use crate::storage::traits::{KeyValueStore, StorageResult};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Key the history array is persisted under
pub const HISTORY_KEY: &str = "checkHistory";

/// Maximum number of entries kept
pub const HISTORY_CAPACITY: usize = 20;

/// Persisted, newest-first list of past results
#[derive(Clone)]
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            capacity: HISTORY_CAPACITY,
        }
    }

    /// Prepends `entry`, dropping the oldest entries beyond capacity
    ///
    /// Entries are not deduplicated: checking the same URL twice records it twice.
    /// A failed read of the stored history fails the append and writes nothing.
    pub fn append(&self, entry: HistoryEntry) -> StorageResult<()> {
        let mut entries = self.read()?;
        entries.insert(0, entry);
        entries.truncate(self.capacity);

        let blob = serde_json::to_string(&entries)?;
        self.store.set(HISTORY_KEY, &blob)?;

        tracing::debug!("History now holds {} entries", entries.len());
        Ok(())
    }

    /// Returns all entries, newest first
    ///
    /// A missing, unreadable or corrupt history is reported as empty.
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.read().unwrap_or_else(|e| {
            tracing::warn!("Failed to read check history: {}", e);
            Vec::new()
        })
    }

    /// Reads the stored entries; only a corrupt blob reads as empty
    fn read(&self) -> StorageResult<Vec<HistoryEntry>> {
        let blob = match self.store.get(HISTORY_KEY)? {
            Some(blob) => blob,
            None => return Ok(Vec::new()),
        };

        match serde_json::from_str(&blob) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!("Discarding corrupt check history: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Looks up an entry by id without modifying the history
    pub fn select(&self, id: &str) -> Option<HistoryEntry> {
        self.list().into_iter().find(|entry| entry.id == id)
    }

    /// Removes every entry
    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove(HISTORY_KEY)
    }

    /// Distinct URLs among the five most recent entries, for input suggestions
    pub fn recent_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        for entry in self.list().into_iter().take(5) {
            if !urls.contains(&entry.url) {
                urls.push(entry.url);
            }
        }
        urls
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Describes how long ago `timestamp` was, relative to `now`
///
/// Produces "Just now", "N min(s) ago", "N hour(s) ago", "N day(s) ago", and
/// falls back to the calendar date after a week.
pub fn relative_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now - timestamp;
    let mins = age.num_minutes();
    let hours = age.num_hours();
    let days = age.num_days();

    if mins < 1 {
        "Just now".to_string()
    } else if mins < 60 {
        format!("{} min{} ago", mins, plural(mins))
    } else if hours < 24 {
        format!("{} hour{} ago", hours, plural(hours))
    } else if days < 7 {
        format!("{} day{} ago", days, plural(days))
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}

/// Shortens a URL for list display (50 characters, then "...")
pub fn truncate_url(url: &str) -> String {
    const MAX: usize = 50;

    if url.chars().count() > MAX {
        let head: String = url.chars().take(MAX).collect();
        format!("{}...", head)
    } else {
        url.to_string()
    }
}

fn plural(n: i64) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}
