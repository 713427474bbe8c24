//! Composite save/delete protocol over the index and the image store.

use std::sync::Arc;

use tracing::{info, warn};

use super::clock::{Clock, SystemClock};
use super::index::HistoryIndex;
use super::types::{DesignCatalog, HistoryItem, HydratedHistoryItem, ImageRef, LandscapingStyle};
use crate::config::Config;
use crate::error::Error;
use crate::images::{ImageStore, StoredImage};
use crate::kv::KvStore;
use crate::provider::{RedesignProvider, RedesignRequest};

/// An image payload on its way into the store.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    /// Base64-encoded image bytes.
    pub base64: String,
    /// MIME type; when blank it is guessed from `name`.
    pub mime_type: String,
    /// Original upload filename, when known.
    pub name: Option<String>,
}

/// Inputs for recording one completed redesign.
#[derive(Debug, Clone)]
pub struct NewRedesign {
    pub original: ImagePayload,
    pub redesigned: ImagePayload,
    pub catalog: DesignCatalog,
    pub style: LandscapingStyle,
    pub climate_zone: String,
}

/// The history engine: one metadata index plus one image store.
///
/// Both storage handles are established once at construction and shared by
/// clones, so every consumer in the process reuses the same database
/// connections.
#[derive(Clone)]
pub struct HistoryEngine {
    index: HistoryIndex,
    images: ImageStore,
    clock: Arc<dyn Clock>,
}

impl HistoryEngine {
    /// Opens the engine against the configured data directory.
    ///
    /// With `storage.ephemeral` set, everything runs in memory instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no data directory can be resolved, or
    /// [`Error::Storage`] if either database cannot be opened.
    pub fn open(config: &Config) -> crate::Result<Self> {
        if config.storage.ephemeral {
            return Ok(Self::memory());
        }

        let history_path = config
            .history_db_path()
            .map_err(|err| Error::Config(err.to_string()))?;
        let images_path = config
            .images_db_path()
            .map_err(|err| Error::Config(err.to_string()))?;

        let kv = KvStore::file(&history_path)
            .map_err(|err| Error::storage("opening history slot store", err))?;
        let images =
            ImageStore::file(&images_path).map_err(|err| Error::storage("opening image store", err))?;

        info!(
            history = %history_path.display(),
            images = %images_path.display(),
            "Opened history engine"
        );

        Ok(Self::with_parts(kv, images, Arc::new(SystemClock)))
    }

    /// Creates an engine over in-memory stores. Nothing is persisted.
    pub fn memory() -> Self {
        Self::with_parts(KvStore::memory(), ImageStore::memory(), Arc::new(SystemClock))
    }

    /// Assembles an engine from explicit parts.
    ///
    /// This is the seam tests and embedders use to supply custom backends
    /// or a deterministic clock.
    pub fn with_parts(kv: KvStore, images: ImageStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            index: HistoryIndex::with_clock(kv, clock.clone()),
            images,
            clock,
        }
    }

    /// The underlying metadata index.
    pub fn index(&self) -> &HistoryIndex {
        &self.index
    }

    /// The underlying image store.
    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// Lists the history, sweeping expired unpinned items first.
    ///
    /// Eviction cascades to the evicted items' image payloads,
    /// best-effort: a payload that fails to delete is logged and left
    /// behind, and the metadata eviction stands regardless.
    pub async fn list(&self) -> Vec<HistoryItem> {
        let (items, evicted) = self.index.list_with_evicted().await;

        for item in &evicted {
            for image_id in [&item.original_image.id, &item.redesigned_image.id] {
                if let Err(err) = self.images.delete(image_id).await {
                    warn!(
                        image_id = %image_id,
                        error = %err,
                        "Failed to delete payload of evicted history item"
                    );
                }
            }
        }

        items
    }

    /// Records a completed redesign.
    ///
    /// Generates a fresh `history_<ms>` id plus `<id>_original` /
    /// `<id>_redesigned` sub-ids, writes both image payloads, then inserts
    /// the metadata record — in that order, so a visible record never
    /// references payloads that were not written.
    ///
    /// Ids are timestamp-derived; two saves within the same millisecond
    /// collide, and the index does not deduplicate.
    ///
    /// # Errors
    ///
    /// - [`Error::Storage`] if the first payload write fails (nothing was
    ///   stored)
    /// - [`Error::PartialSave`] if a later step fails; already-written
    ///   payloads are not rolled back and remain as orphans
    pub async fn save_redesign(&self, new: NewRedesign) -> crate::Result<HistoryItem> {
        let NewRedesign {
            original,
            redesigned,
            catalog,
            style,
            climate_zone,
        } = new;

        let now = self.clock.now_ms();
        let id = format!("history_{now}");
        let original_id = format!("{id}_original");
        let redesigned_id = format!("{id}_redesigned");

        let original_mime = resolve_mime_type(&original.mime_type, original.name.as_deref());
        let redesigned_mime = resolve_mime_type(&redesigned.mime_type, redesigned.name.as_deref());

        self.images
            .put(StoredImage {
                id: original_id.clone(),
                base64: original.base64,
                mime_type: original_mime.clone(),
            })
            .await
            .map_err(|err| Error::storage("storing original image", err))?;

        self.images
            .put(StoredImage {
                id: redesigned_id.clone(),
                base64: redesigned.base64,
                mime_type: redesigned_mime.clone(),
            })
            .await
            .map_err(|err| Error::partial_save("storing redesigned image", err))?;

        let item = HistoryItem {
            id,
            timestamp: now,
            is_pinned: false,
            style,
            climate_zone,
            design_catalog: catalog,
            original_image: ImageRef {
                id: original_id,
                mime_type: original_mime,
                name: original.name,
            },
            redesigned_image: ImageRef {
                id: redesigned_id,
                mime_type: redesigned_mime,
                name: redesigned.name,
            },
        };

        self.index.insert(item.clone()).await.map_err(|err| {
            Error::partial_save("recording history metadata", anyhow::Error::new(err))
        })?;

        Ok(item)
    }

    /// Deletes a history item and both referenced image payloads.
    ///
    /// The payloads are deleted independently: a failure on one is logged
    /// and does not block the other, and the metadata record is removed
    /// regardless of the payload outcome, so an entry can never get stuck.
    /// Returns the resulting listing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] only if the metadata removal itself
    /// cannot be persisted.
    pub async fn delete_item(&self, id: &str) -> crate::Result<Vec<HistoryItem>> {
        let items = self.list().await;

        if let Some(item) = items.iter().find(|item| item.id == id) {
            for image_id in [&item.original_image.id, &item.redesigned_image.id] {
                if let Err(err) = self.images.delete(image_id).await {
                    warn!(
                        image_id = %image_id,
                        error = %err,
                        "Failed to delete image payload; removing metadata anyway"
                    );
                }
            }
        }

        self.index.delete(id).await
    }

    /// Flips the pinned state of a history item. See
    /// [`HistoryIndex::toggle_pin`] for the pin-cap semantics.
    pub async fn toggle_pin(&self, id: &str) -> crate::Result<Vec<HistoryItem>> {
        self.index.toggle_pin(id).await
    }

    /// Resolves a history item together with both image payloads.
    ///
    /// A missing payload fails this item only; the rest of the history is
    /// unaffected.
    ///
    /// # Errors
    ///
    /// - [`Error::ItemNotFound`] if no item has the given id
    /// - [`Error::ImageNotFound`] if a referenced payload is missing
    /// - [`Error::Storage`] if the image store fails
    pub async fn load_item(&self, id: &str) -> crate::Result<HydratedHistoryItem> {
        let items = self.list().await;
        let Some(item) = items.into_iter().find(|item| item.id == id) else {
            return Err(Error::item_not_found(id));
        };

        let original = self.fetch_image(&item.original_image.id).await?;
        let redesigned = self.fetch_image(&item.redesigned_image.id).await?;

        Ok(HydratedHistoryItem {
            item,
            original,
            redesigned,
        })
    }

    /// Requests a redesign from the provider and records the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Provider`] if the provider fails, otherwise the
    /// same errors as [`Self::save_redesign`].
    pub async fn redesign_and_save(
        &self,
        provider: &dyn RedesignProvider,
        original: ImagePayload,
        style: LandscapingStyle,
        allow_structural_changes: bool,
        climate_zone: String,
    ) -> crate::Result<HistoryItem> {
        let request = RedesignRequest {
            image_base64: original.base64.clone(),
            mime_type: original.mime_type.clone(),
            style,
            allow_structural_changes,
            climate_zone: climate_zone.clone(),
        };

        let outcome = provider.redesign(&request).await.map_err(Error::Provider)?;

        self.save_redesign(NewRedesign {
            original,
            redesigned: ImagePayload {
                base64: outcome.image_base64,
                mime_type: outcome.mime_type,
                name: None,
            },
            catalog: outcome.catalog,
            style,
            climate_zone,
        })
        .await
    }

    async fn fetch_image(&self, id: &str) -> crate::Result<StoredImage> {
        match self.images.get(id).await {
            Ok(Some(image)) => Ok(image),
            Ok(None) => Err(Error::image_not_found(id)),
            Err(err) => Err(Error::storage("reading image payload", err)),
        }
    }
}

/// Resolves the MIME type for a payload: the caller-supplied type when
/// present, a guess from the filename otherwise, octet-stream as a last
/// resort.
fn resolve_mime_type(mime_type: &str, name: Option<&str>) -> String {
    if !mime_type.trim().is_empty() {
        return mime_type.to_string();
    }

    name.and_then(|name| mime_guess::from_path(name).first())
        .map_or_else(
            || "application/octet-stream".to_string(),
            |mime| mime.to_string(),
        )
}
