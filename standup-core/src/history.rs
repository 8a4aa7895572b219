//! Session history document.
//!
//! A newest-first, capped log of completed sessions, persisted through the
//! store as a single JSON array under [`HISTORY_KEY`].

use chrono::Utc;

use crate::error::Result;
use crate::store::{Store, HISTORY_KEY};
use crate::types::HistoryEntry;

/// Upper bound on persisted entries; the oldest beyond this are discarded.
pub const HISTORY_CAPACITY: usize = 30;

/// Reads the persisted log. Missing or corrupt data is an empty list.
pub fn load(store: &dyn Store) -> Vec<HistoryEntry> {
    store
        .get(HISTORY_KEY)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

/// Builds the entry for a just-completed session.
pub fn new_entry(
    participants_order: Vec<String>,
    next_owner: String,
    total_duration: u32,
) -> HistoryEntry {
    let now = Utc::now();
    HistoryEntry {
        id: format!("{}-{}", now.format("%Y-%m-%d"), now.timestamp_millis()),
        date: now,
        participants_order,
        next_owner,
        total_duration,
        created_at: now,
    }
}

/// Prepends `entry`, truncates to capacity, and writes through.
pub fn record(store: &mut dyn Store, entry: HistoryEntry) -> Result<()> {
    let mut log = load(store);
    log.insert(0, entry);
    log.truncate(HISTORY_CAPACITY);
    let raw = serde_json::to_string(&log)?;
    store.set(HISTORY_KEY, &raw)
}

/// Drops the persisted log entirely.
pub fn clear(store: &mut dyn Store) -> Result<()> {
    store.remove(HISTORY_KEY)
}
