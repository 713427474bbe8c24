//! Redb-backed image storage.

use super::backend::ImageBackend;
use super::types::StoredImage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// Table holding image records, keyed by id.
const IMAGES_TABLE: TableDefinition<'static, &'static str, &'static [u8]> =
    TableDefinition::new("images");

/// Persistent image storage backend with ACID guarantees.
///
/// Records are serialized as JSON values inside the database, so an image
/// and its MIME type commit atomically.
///
/// # Thread Safety
///
/// `RedbImageBackend` is `Clone`; clones share the same database handle,
/// so a store opened once per process is reused by every consumer.
#[derive(Clone)]
pub struct RedbImageBackend {
    db: Arc<Database>,
}

impl RedbImageBackend {
    /// Opens or creates a redb database at the given path.
    ///
    /// Creates parent directories if needed and establishes the images
    /// table exactly once, so later reads never observe a missing table.
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
                format!(
                    "Failed to create image store directory: {}",
                    parent.display()
                )
            })?;
        }

        let db = Database::create(path)
            .with_context(|| format!("Failed to open image store: {}", path.display()))?;

        let write_txn = db
            .begin_write()
            .context("Failed to begin initialization transaction")?;
        {
            let _table = write_txn
                .open_table(IMAGES_TABLE)
                .context("Failed to initialize images table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initialization transaction")?;

        Ok(Self { db: Arc::new(db) })
    }

    fn put_sync(&self, image: &StoredImage) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;

        {
            let mut table = write_txn
                .open_table(IMAGES_TABLE)
                .context("Failed to open images table")?;

            let json = serde_json::to_vec(image).context("Failed to serialize image record")?;

            table
                .insert(image.id.as_str(), json.as_slice())
                .with_context(|| format!("Failed to write image '{}'", image.id))?;
        }

        write_txn.commit().context("Failed to commit image write")?;

        Ok(())
    }

    fn get_sync(&self, id: &str) -> Result<Option<StoredImage>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;

        let table = read_txn
            .open_table(IMAGES_TABLE)
            .context("Failed to open images table")?;

        let result = table
            .get(id)
            .with_context(|| format!("Failed to read image '{id}'"))?;

        match result {
            Some(guard) => {
                let image = serde_json::from_slice(guard.value())
                    .with_context(|| format!("Failed to deserialize image record '{id}'"))?;
                Ok(Some(image))
            },
            None => Ok(None),
        }
    }

    fn delete_sync(&self, id: &str) -> Result<bool> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;

        let removed = {
            let mut table = write_txn
                .open_table(IMAGES_TABLE)
                .context("Failed to open images table")?;

            table
                .remove(id)
                .with_context(|| format!("Failed to remove image '{id}'"))?
                .is_some()
        };

        write_txn.commit().context("Failed to commit image removal")?;

        Ok(removed)
    }
}

#[async_trait]
impl ImageBackend for RedbImageBackend {
    async fn put(&self, image: StoredImage) -> Result<()> {
        let backend = self.clone();
        tokio::task::spawn_blocking(move || backend.put_sync(&image))
            .await
            .context("Task join error")?
    }

    async fn get(&self, id: &str) -> Result<Option<StoredImage>> {
        let backend = self.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || backend.get_sync(&id))
            .await
            .context("Task join error")?
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let backend = self.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || backend.delete_sync(&id))
            .await
            .context("Task join error")?
    }
}
