//! Namespaced key/value storage.
//!
//! # Data Flow
//! ```text
//! NamespacedStorage::set_item(key, value)
//!     → read JSON object stored under the namespace key
//!     → insert key
//!     → write object back to the backend (memory or file)
//! ```
//!
//! # Design Decisions
//! - The backend is a constructor parameter, not a subclass
//! - Everything lives under one namespace key so `clear` is a single removal

pub mod backend;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::StorageConfig;

/// Errors that can occur while reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage data is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("storage namespace '{0}' does not hold a JSON object")]
    NotAnObject(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// JSON values kept under a single namespace key of a backing store.
#[derive(Debug)]
pub struct NamespacedStorage<B: StorageBackend> {
    backend: B,
    namespace: String,
}

impl NamespacedStorage<MemoryBackend> {
    /// Storage that lasts as long as the process.
    pub fn session(namespace: impl Into<String>) -> Self {
        Self::new(MemoryBackend::new(), namespace)
    }
}

impl NamespacedStorage<FileBackend> {
    /// Persistent storage configured from `[storage]`.
    pub fn local(config: &StorageConfig) -> Self {
        Self::new(FileBackend::new(&config.local_path), config.namespace.clone())
    }
}

impl<B: StorageBackend> NamespacedStorage<B> {
    pub fn new(backend: B, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Raw JSON value for `key`. `null` counts as absent.
    pub fn get_item(&self, key: &str) -> StorageResult<Option<Value>> {
        let mut data = self.load()?;
        Ok(data.remove(key).filter(|v| !v.is_null()))
    }

    /// Typed value for `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.get_item(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub fn set_item<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let mut data = self.load()?;
        data.insert(key.to_string(), serde_json::to_value(value)?);
        self.save(&data)
    }

    pub fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut data = self.load()?;
        data.remove(key);
        self.save(&data)
    }

    /// Drop everything in the namespace.
    pub fn clear(&self) -> StorageResult<()> {
        self.backend.remove_item(&self.namespace)
    }

    fn load(&self) -> StorageResult<Map<String, Value>> {
        match self.backend.get_item(&self.namespace)? {
            None => Ok(Map::new()),
            Some(raw) => match serde_json::from_str(&raw)? {
                Value::Object(map) => Ok(map),
                _ => Err(StorageError::NotAnObject(self.namespace.clone())),
            },
        }
    }

    fn save(&self, data: &Map<String, Value>) -> StorageResult<()> {
        let raw = serde_json::to_string(data)?;
        self.backend.set_item(&self.namespace, &raw)
    }
}
