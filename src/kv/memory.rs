//! In-memory slot storage backend.

use super::backend::KvBackend;
use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

/// Non-persistent slot storage backend using DashMap.
///
/// All data is lost when the process exits. Intended for tests and
/// embedded use where durability is not wanted.
#[derive(Clone, Default)]
pub struct MemoryKvBackend {
    data: DashMap<String, Vec<u8>>,
}

impl MemoryKvBackend {
    /// Creates a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of slots in the store.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl KvBackend for MemoryKvBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.data.remove(key).is_some())
    }

    async fn list(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        for entry in &self.data {
            let key = entry.key();

            if let Some(prefix) = prefix
                && !key.starts_with(prefix)
            {
                continue;
            }

            keys.push(key.clone());
        }

        Ok(keys)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.data.contains_key(key))
    }
}
