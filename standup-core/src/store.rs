//! Key-value persistence port.
//!
//! The state machine never touches the filesystem directly; it talks to a
//! [`Store`] so tests can swap in an in-memory fake. Values are raw JSON
//! document strings under well-known keys.

use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Store key for the persisted session configuration document.
pub const CONFIG_KEY: &str = "session_config";

/// Store key for the persisted history document.
pub const HISTORY_KEY: &str = "daily_history";

/// Synchronous key-value storage for the two persisted documents.
///
/// Reads never fail from the caller's perspective: anything unreadable is
/// `None` and the caller falls back to defaults.
pub trait Store {
    /// Returns the stored value for `key`, or `None` if absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Deletes `key` if present.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Filesystem-backed store: one `<key>.json` file per key under a data
/// directory.
///
/// Writes are plain read-modify-write with no locking; two concurrent
/// processes can clobber each other. Accepted for a single-user tool.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.get("missing").is_none());

        store.set("doc", "{}").unwrap();
        assert_eq!(store.get("doc").as_deref(), Some("{}"));

        store.remove("doc").unwrap();
        assert!(store.get("doc").is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("docs"));

        assert!(store.get("doc").is_none());
        store.set("doc", r#"{"a":1}"#).unwrap();
        assert_eq!(store.get("doc").as_deref(), Some(r#"{"a":1}"#));

        // Overwrite replaces, remove deletes, remove again is a no-op.
        store.set("doc", r#"{"a":2}"#).unwrap();
        assert_eq!(store.get("doc").as_deref(), Some(r#"{"a":2}"#));
        store.remove("doc").unwrap();
        assert!(store.get("doc").is_none());
        store.remove("doc").unwrap();
    }
}
