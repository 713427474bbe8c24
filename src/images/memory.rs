//! In-memory image storage backend.

use super::backend::ImageBackend;
use super::types::StoredImage;
use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

/// Non-persistent image storage backend using DashMap.
///
/// All data is lost when the process exits. Intended for tests and
/// embedded use where durability is not wanted.
#[derive(Clone, Default)]
pub struct MemoryImageBackend {
    data: DashMap<String, StoredImage>,
}

impl MemoryImageBackend {
    /// Creates a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored images.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl ImageBackend for MemoryImageBackend {
    async fn put(&self, image: StoredImage) -> Result<()> {
        self.data.insert(image.id.clone(), image);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<StoredImage>> {
        Ok(self.data.get(id).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.data.remove(id).is_some())
    }
}
