// Allow dead code: alternate backends are constructed by callers as needed
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Key-value persistence used for the session record.
///
/// Mirrors the browser-local storage surface the session layer needs:
/// string keys, string values, removal of a missing key is a no-op.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Storage backed by a single JSON file of string pairs.
///
/// The whole map is rewritten on every mutation; the session record is a
/// handful of short strings, so this stays cheap.
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open (or create) the storage file at `path`.
    ///
    /// A missing file is an empty store. A corrupt file is discarded and
    /// treated as empty; it will be rewritten on the next `set`.
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read storage file {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Discarding corrupt storage file");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries })
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write storage file {}", self.path.display()))?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

/// Ephemeral in-memory storage.
#[derive(Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
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
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut storage = FileStorage::open(path.clone()).unwrap();
        storage.set("userInfo", r#"{"token":"abc"}"#).unwrap();
        storage.set("loginTime", "1700000000000").unwrap();

        // Reopen from disk
        let storage = FileStorage::open(path).unwrap();
        assert_eq!(storage.get("userInfo").as_deref(), Some(r#"{"token":"abc"}"#));
        assert_eq!(storage.get("loginTime").as_deref(), Some("1700000000000"));
    }

    #[test]
    fn test_file_storage_remove_missing_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path().join("store.json")).unwrap();
        storage.remove("loginTime").unwrap();
        assert!(storage.get("loginTime").is_none());
    }

    #[test]
    fn test_file_storage_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = FileStorage::open(path).unwrap();
        assert!(storage.get("userInfo").is_none());
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert!(storage.get("userInfo").is_none());
        storage.set("userInfo", "{}").unwrap();
        assert_eq!(storage.get("userInfo").as_deref(), Some("{}"));
        storage.remove("userInfo").unwrap();
        assert!(storage.get("userInfo").is_none());
    }
}
