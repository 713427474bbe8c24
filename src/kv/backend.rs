//! Backend trait for the slot store.

use anyhow::Result;
use async_trait::async_trait;

/// Backend trait for string-keyed byte storage.
///
/// All backends must be thread-safe (`Send + Sync`) for use with tokio.
/// Implementations handle their own concurrency and provide appropriate
/// durability guarantees where applicable.
#[async_trait]
pub trait KvBackend: Send + Sync + 'static {
    /// Retrieves a value by key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores a key-value pair, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Deletes a key-value pair.
    ///
    /// Returns `Ok(true)` if the key existed and was removed, `Ok(false)`
    /// if it did not exist. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Lists all keys matching an optional prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn list(&self, prefix: Option<&str>) -> Result<Vec<String>>;

    /// Checks if a key exists.
    ///
    /// Default implementation uses `get()`, but backends may override
    /// for efficiency.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
