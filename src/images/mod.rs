//! Id-keyed image payload store with pluggable backends.
//!
//! Image payloads are stored independently of history metadata: the index
//! holds references by id, this store holds the bytes. Two backends are
//! included:
//!
//! - **RedbImageBackend**: persistent storage with ACID guarantees (default)
//! - **MemoryImageBackend**: fast, non-persistent storage for tests/embedding
//!
//! Records carry their MIME type alongside the base64 payload so a record
//! is self-describing; there are no relationships between records.

mod backend;
mod memory;
mod redb;
mod types;

pub use backend::ImageBackend;
pub use memory::MemoryImageBackend;
pub use redb::RedbImageBackend;
pub use types::StoredImage;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// High-level image store interface.
///
/// Wraps an `ImageBackend` implementation and provides a consistent API
/// regardless of the underlying storage mechanism.
///
/// # Thread Safety
///
/// `ImageStore` is `Clone`; clones share the same backend, so the handle
/// established at open is reused for the life of the process.
#[derive(Clone)]
pub struct ImageStore {
    backend: Arc<dyn ImageBackend>,
}

impl ImageStore {
    /// Creates an `ImageStore` backed by a file-based redb database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let backend = RedbImageBackend::open(path)?;
        Ok(Self {
            backend: Arc::new(backend),
        })
    }

    /// Creates an `ImageStore` backed by an in-memory store.
    pub fn memory() -> Self {
        Self {
            backend: Arc::new(MemoryImageBackend::new()),
        }
    }

    /// Creates an `ImageStore` with a custom backend.
    pub fn custom<B: ImageBackend>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Creates an `ImageStore` from a boxed backend.
    pub fn from_boxed(backend: Box<dyn ImageBackend>) -> Self {
        Self {
            backend: Arc::from(backend),
        }
    }

    /// Stores an image payload (upsert: an existing id is overwritten).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    pub async fn put(&self, image: StoredImage) -> Result<()> {
        self.backend.put(image).await
    }

    /// Retrieves an image payload by id. Returns `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    pub async fn get(&self, id: &str) -> Result<Option<StoredImage>> {
        self.backend.get(id).await
    }

    /// Deletes an image payload. Returns `Ok(true)` if it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.backend.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(id: &str) -> StoredImage {
        StoredImage {
            id: id.to_string(),
            base64: "aGVsbG8=".to_string(),
            mime_type: "image/png".to_string(),
        }
    }

    fn create_store() -> (ImageStore, TempDir) {
        let tmp = TempDir::new().unwrap();
        let store = ImageStore::file(tmp.path().join("images.redb")).unwrap();
        (store, tmp)
    }

    #[tokio::test]
    async fn test_put_and_get_round_trip() {
        let (store, _tmp) = create_store();

        let image = sample("img_1");
        store.put(image.clone()).await.unwrap();

        let loaded = store.get("img_1").await.unwrap().unwrap();
        assert_eq!(loaded, image);
    }

    #[tokio::test]
    async fn test_get_missing_is_none_not_error() {
        let (store, _tmp) = create_store();

        let result = store.get("missing").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_overwrite_existing_id() {
        let (store, _tmp) = create_store();

        store.put(sample("img_1")).await.unwrap();

        let replacement = StoredImage {
            id: "img_1".to_string(),
            base64: "d29ybGQ=".to_string(),
            mime_type: "image/jpeg".to_string(),
        };
        store.put(replacement.clone()).await.unwrap();

        let loaded = store.get("img_1").await.unwrap().unwrap();
        assert_eq!(loaded, replacement);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_absent() {
        let (store, _tmp) = create_store();

        store.put(sample("img_1")).await.unwrap();
        assert!(store.delete("img_1").await.unwrap());
        assert!(store.get("img_1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_double_delete_is_noop() {
        let (store, _tmp) = create_store();

        store.put(sample("img_1")).await.unwrap();
        assert!(store.delete("img_1").await.unwrap());
        assert!(!store.delete("img_1").await.unwrap());
    }

    #[tokio::test]
    async fn test_fresh_store_read_before_any_write() {
        // The images table is established at open, so a read on a fresh
        // database must report absence rather than a missing-table error.
        let (store, _tmp) = create_store();
        assert!(store.get("anything").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_persistence_across_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("images.redb");

        {
            let store = ImageStore::file(&path).unwrap();
            store.put(sample("img_1")).await.unwrap();
        }

        let reopened = ImageStore::file(&path).unwrap();
        let loaded = reopened.get("img_1").await.unwrap().unwrap();
        assert_eq!(loaded.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_memory_backend_round_trip() {
        let store = ImageStore::memory();

        store.put(sample("img_1")).await.unwrap();
        assert!(store.get("img_1").await.unwrap().is_some());
        assert!(store.delete("img_1").await.unwrap());
        assert!(store.get("img_1").await.unwrap().is_none());
    }
}
