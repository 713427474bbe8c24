//! High-level `KvStore` wrapper over backend implementations.

use super::backend::KvBackend;
use super::memory::MemoryKvBackend;
use super::redb::RedbKvBackend;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// High-level slot store interface.
///
/// Wraps a `KvBackend` implementation and provides a consistent API
/// regardless of the underlying storage mechanism.
///
/// # Thread Safety
///
/// `KvStore` is `Clone`; clones share the same backend.
#[derive(Clone)]
pub struct KvStore {
    backend: Arc<dyn KvBackend>,
}

impl KvStore {
    /// Creates a `KvStore` backed by a file-based redb database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let backend = RedbKvBackend::open(path)?;
        Ok(Self {
            backend: Arc::new(backend),
        })
    }

    /// Creates a `KvStore` backed by an in-memory store.
    pub fn memory() -> Self {
        Self {
            backend: Arc::new(MemoryKvBackend::new()),
        }
    }

    /// Creates a `KvStore` with a custom backend.
    pub fn custom<B: KvBackend>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Creates a `KvStore` from a boxed backend.
    pub fn from_boxed(backend: Box<dyn KvBackend>) -> Self {
        Self {
            backend: Arc::from(backend),
        }
    }

    /// Retrieves a value by key. Returns `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.backend.get(key).await
    }

    /// Stores a key-value pair, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    pub async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.backend.set(key, value.to_vec()).await
    }

    /// Deletes a key-value pair. Returns `Ok(true)` if it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        self.backend.delete(key).await
    }

    /// Lists all keys matching an optional prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    pub async fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        self.backend.list(prefix).await
    }

    /// Checks if a key exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    pub async fn exists(&self, key: &str) -> Result<bool> {
        self.backend.exists(key).await
    }
}
