//! Backing stores for namespaced storage.
//!
//! # Responsibilities
//! - Provide string key/value access with a common interface
//! - Session-scoped store (in memory, gone with the process)
//! - Persistent store (JSON file on disk)

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use dashmap::DashMap;

use crate::storage::StorageResult;

/// A string key/value store.
pub trait StorageBackend: Send + Sync {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// Session-scoped store.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: DashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).map(|r| r.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// Persistent store kept as a JSON object in a single file.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn save(&self, items: &HashMap<String, String>) -> StorageResult<()> {
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer(writer, items)?;
        tracing::trace!(path = ?self.path, entries = items.len(), "Storage file written");
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.load()?;
        if items.remove(key).is_some() {
            self.save(&items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend() {
        let store = MemoryBackend::new();
        assert!(store.is_empty());

        store.set_item("a", "1").unwrap();
        assert_eq!(store.get_item("a").unwrap().as_deref(), Some("1"));

        store.remove_item("a").unwrap();
        assert_eq!(store.get_item("a").unwrap(), None);
        store.remove_item("a").unwrap();
    }

    #[test]
    fn test_file_backend_persists() {
        let path = std::env::temp_dir().join(format!("api-toolkit-store-{}.json", uuid::Uuid::new_v4()));

        let store = FileBackend::new(&path);
        assert_eq!(store.get_item("theme").unwrap(), None);
        store.set_item("theme", "dark").unwrap();

        let reopened = FileBackend::new(&path);
        assert_eq!(reopened.get_item("theme").unwrap().as_deref(), Some("dark"));

        reopened.remove_item("theme").unwrap();
        assert_eq!(store.get_item("theme").unwrap(), None);

        let _ = std::fs::remove_file(&path);
    }
}
