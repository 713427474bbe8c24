//! Error types for history and image storage operations.
//!
//! Callers branch on these variants to decide what to show the user:
//! `PinLimitReached` and `ItemNotFound` are expected, user-actionable
//! conditions, while `Storage` and `PartialSave` indicate the underlying
//! store failed and the operation was aborted.

/// Result type for history store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the public history API.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No history item with the given id exists.
    #[error("history item not found: {id}")]
    ItemNotFound { id: String },

    /// A referenced image payload is missing from the image store.
    #[error("image not found: {id}")]
    ImageNotFound { id: String },

    /// Pinning was rejected because the pin cap is already reached.
    #[error("pin limit reached: {limit} items are already pinned")]
    PinLimitReached { limit: usize },

    /// The underlying store failed to open, read, write, or delete.
    #[error("storage failure while {context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    /// A composite save failed after some writes had already completed.
    ///
    /// Already-written image payloads are not rolled back; they remain as
    /// orphans until the ids are reused or cleaned up externally.
    #[error("redesign save incomplete while {context}: {source}")]
    PartialSave {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The redesign provider returned a failure.
    #[error("redesign provider error: {0}")]
    Provider(#[source] anyhow::Error),
}

impl Error {
    /// Create a storage error with context.
    pub fn storage(context: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Storage {
            context: context.into(),
            source,
        }
    }

    /// Create a partial-save error with context.
    pub fn partial_save(context: impl Into<String>, source: anyhow::Error) -> Self {
        Self::PartialSave {
            context: context.into(),
            source,
        }
    }

    /// Create an item-not-found error.
    pub fn item_not_found(id: impl Into<String>) -> Self {
        Self::ItemNotFound { id: id.into() }
    }

    /// Create an image-not-found error.
    pub fn image_not_found(id: impl Into<String>) -> Self {
        Self::ImageNotFound { id: id.into() }
    }
}
