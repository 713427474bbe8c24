//! Backend trait for the image store.

use super::types::StoredImage;
use anyhow::Result;
use async_trait::async_trait;

/// Backend trait for id-keyed image payload storage.
///
/// All backends must be thread-safe (`Send + Sync`) for use with tokio.
/// No retry is performed at this layer; a failed operation surfaces to the
/// caller, which decides whether to retry.
#[async_trait]
pub trait ImageBackend: Send + Sync + 'static {
    /// Stores an image payload, overwriting any existing record with the
    /// same id (upsert semantics).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn put(&self, image: StoredImage) -> Result<()>;

    /// Retrieves an image payload by id.
    ///
    /// Returns `Ok(None)` for a missing id; a missing key is never an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn get(&self, id: &str) -> Result<Option<StoredImage>>;

    /// Deletes an image payload.
    ///
    /// Returns `Ok(true)` if the id existed and was removed, `Ok(false)`
    /// if it did not exist. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn delete(&self, id: &str) -> Result<bool>;
}
