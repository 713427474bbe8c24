//! Redb-backed slot storage.

use super::backend::KvBackend;
use anyhow::{Context, Result};
use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// Table holding the named slots.
const SLOTS_TABLE: TableDefinition<'static, &'static str, &'static [u8]> =
    TableDefinition::new("slots");

/// Persistent slot storage backend with ACID guarantees.
///
/// # Thread Safety
///
/// `RedbKvBackend` is `Clone`; clones share the same database handle, so a
/// store opened once per process is reused by every consumer.
#[derive(Clone)]
pub struct RedbKvBackend {
    db: Arc<Database>,
}

impl RedbKvBackend {
    /// Opens or creates a redb database at the given path.
    ///
    /// Creates parent directories if needed and establishes the slots table
    /// so that later reads never observe a missing table.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The parent directory cannot be created
    /// - The database file cannot be opened or created
    /// - The initialization transaction fails to begin or commit
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create slot store directory: {}", parent.display())
            })?;
        }

        let db = Database::create(path)
            .with_context(|| format!("Failed to open slot store: {}", path.display()))?;

        let write_txn = db
            .begin_write()
            .context("Failed to begin initialization transaction")?;
        {
            let _table = write_txn
                .open_table(SLOTS_TABLE)
                .context("Failed to initialize slots table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initialization transaction")?;

        Ok(Self { db: Arc::new(db) })
    }

    fn get_sync(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;

        let table = read_txn
            .open_table(SLOTS_TABLE)
            .context("Failed to open slots table")?;

        let result = table
            .get(key)
            .with_context(|| format!("Failed to read slot '{key}'"))?;

        Ok(result.map(|guard| guard.value().to_vec()))
    }

    fn set_sync(&self, key: &str, value: &[u8]) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;

        {
            let mut table = write_txn
                .open_table(SLOTS_TABLE)
                .context("Failed to open slots table")?;

            table
                .insert(key, value)
                .with_context(|| format!("Failed to write slot '{key}'"))?;
        }

        write_txn.commit().context("Failed to commit slot write")?;

        Ok(())
    }

    fn delete_sync(&self, key: &str) -> Result<bool> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;

        let removed = {
            let mut table = write_txn
                .open_table(SLOTS_TABLE)
                .context("Failed to open slots table")?;

            table
                .remove(key)
                .with_context(|| format!("Failed to remove slot '{key}'"))?
                .is_some()
        };

        write_txn.commit().context("Failed to commit slot removal")?;

        Ok(removed)
    }

    fn list_sync(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;

        let table = read_txn
            .open_table(SLOTS_TABLE)
            .context("Failed to open slots table")?;

        let mut keys = Vec::new();

        for item in table.iter().context("Failed to iterate slots table")? {
            let (key, _value) = item.context("Failed to read slot entry")?;
            let key_str = key.value();

            if let Some(prefix) = prefix
                && !key_str.starts_with(prefix)
            {
                continue;
            }

            keys.push(key_str.to_string());
        }

        Ok(keys)
    }
}

#[async_trait]
impl KvBackend for RedbKvBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let backend = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || backend.get_sync(&key))
            .await
            .context("Task join error")?
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let backend = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || backend.set_sync(&key, &value))
            .await
            .context("Task join error")?
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let backend = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || backend.delete_sync(&key))
            .await
            .context("Task join error")?
    }

    async fn list(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let backend = self.clone();
        let prefix = prefix.map(std::string::ToString::to_string);
        tokio::task::spawn_blocking(move || backend.list_sync(prefix.as_deref()))
            .await
            .context("Task join error")?
    }
}
