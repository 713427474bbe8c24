//! Ordered metadata index with retention and pin-limit policy.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};
use super::types::{HistoryFile, HistoryItem};
use crate::constants::{HISTORY_FORMAT_VERSION, MAX_PINNED_ITEMS, RETENTION_WINDOW_MS};
use crate::error::Error;
use crate::kv::KvStore;

/// Slot under which the serialized history collection is stored.
const HISTORY_SLOT: &str = "history";

/// Ordered collection of [`HistoryItem`] records.
///
/// The whole collection is persisted as one versioned JSON value under a
/// single slot of the backing [`KvStore`]. Listing sweeps expired unpinned
/// items; [`Self::toggle_pin`] enforces the pin cap.
///
/// # Ordering
///
/// Listings are always sorted pinned-before-unpinned, then by descending
/// timestamp within each group. The order is recomputed on every mutation
/// rather than maintained incrementally.
///
/// # Concurrency
///
/// Mutations are read-modify-write over the slot with no locking: two
/// callers racing on the same index can lose updates (last writer wins).
/// The store assumes a single logical writer; multi-writer deployments
/// would need a version stamp per record, which is deliberately not built.
#[derive(Clone)]
pub struct HistoryIndex {
    kv: KvStore,
    clock: Arc<dyn Clock>,
    corrupt_reads: Arc<AtomicU64>,
}

impl HistoryIndex {
    /// Creates an index over the given slot store using the system clock.
    pub fn new(kv: KvStore) -> Self {
        Self::with_clock(kv, Arc::new(SystemClock))
    }

    /// Creates an index with an injected clock (used by tests to drive the
    /// retention sweep deterministically).
    pub fn with_clock(kv: KvStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            kv,
            clock,
            corrupt_reads: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of reads that found the slot malformed or of an unsupported
    /// version since this index was created.
    ///
    /// Reads fail open (an unreadable slot lists as empty), so this counter
    /// is the channel through which corruption stays observable.
    pub fn corrupt_reads(&self) -> u64 {
        self.corrupt_reads.load(Ordering::Relaxed)
    }

    /// Lists the history, sweeping expired unpinned items first.
    ///
    /// The swept collection is written back only when the sweep actually
    /// removed something. Never fails: an absent, malformed, or unreadable
    /// slot lists as empty, and a failed sweep write-back is logged and
    /// ignored.
    pub async fn list(&self) -> Vec<HistoryItem> {
        self.list_with_evicted().await.0
    }

    /// Like [`Self::list`], but also returns the items the sweep evicted
    /// so the engine can cascade their image payloads.
    pub(crate) async fn list_with_evicted(&self) -> (Vec<HistoryItem>, Vec<HistoryItem>) {
        let now = self.clock.now_ms();
        let mut items = self.read_slot().await;

        let evicted = sweep_expired(&mut items, now);
        if !evicted.is_empty() {
            debug!(
                removed = evicted.len(),
                "Retention sweep evicted expired history items"
            );
            if let Err(err) = self.write_slot(&items).await {
                warn!(error = %err, "Failed to persist retention sweep");
            }
        }

        sort_for_listing(&mut items);
        (items, evicted)
    }

    /// Inserts a new item ahead of all existing items and persists.
    ///
    /// The caller supplies the unique id; no uniqueness check is made.
    /// Inserting a duplicate id leaves two records with that id in the
    /// collection, and later operations on the id affect both.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the slot cannot be written.
    pub async fn insert(&self, item: HistoryItem) -> crate::Result<()> {
        let existing = self.list().await;

        let mut items = Vec::with_capacity(existing.len() + 1);
        items.push(item);
        items.extend(existing);

        self.write_slot(&items).await
    }

    /// Removes the item with the given id, if present, and persists.
    ///
    /// Returns the resulting listing (already swept and sorted). Deleting
    /// an absent id is a no-op that still returns the current listing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the slot cannot be written.
    pub async fn delete(&self, id: &str) -> crate::Result<Vec<HistoryItem>> {
        let mut items = self.list().await;
        items.retain(|item| item.id != id);

        self.write_slot(&items).await?;
        Ok(items)
    }

    /// Flips the pinned state of the item with the given id.
    ///
    /// Pinning is rejected with [`Error::PinLimitReached`] when the cap of
    /// [`MAX_PINNED_ITEMS`] is already in use, leaving the persisted state
    /// unchanged; unpinning always succeeds. Returns the re-sorted listing.
    ///
    /// # Errors
    ///
    /// - [`Error::ItemNotFound`] if no item has the given id
    /// - [`Error::PinLimitReached`] if pinning would exceed the cap
    /// - [`Error::Storage`] if the slot cannot be written
    pub async fn toggle_pin(&self, id: &str) -> crate::Result<Vec<HistoryItem>> {
        let mut items = self.list().await;

        let Some(target) = items.iter().find(|item| item.id == id) else {
            return Err(Error::item_not_found(id));
        };

        if !target.is_pinned {
            let pinned = items.iter().filter(|item| item.is_pinned).count();
            if pinned >= MAX_PINNED_ITEMS {
                return Err(Error::PinLimitReached {
                    limit: MAX_PINNED_ITEMS,
                });
            }
        }

        for item in &mut items {
            if item.id == id {
                item.is_pinned = !item.is_pinned;
            }
        }

        sort_for_listing(&mut items);
        self.write_slot(&items).await?;
        Ok(items)
    }

    /// Reads the slot, failing open to an empty collection.
    async fn read_slot(&self) -> Vec<HistoryItem> {
        let bytes = match self.kv.get(HISTORY_SLOT).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "Failed to read history slot; listing as empty");
                return Vec::new();
            },
        };

        match serde_json::from_slice::<HistoryFile>(&bytes) {
            Ok(file) if file.version == HISTORY_FORMAT_VERSION => file.items,
            Ok(file) => {
                self.corrupt_reads.fetch_add(1, Ordering::Relaxed);
                warn!(
                    version = file.version,
                    "Unsupported history format version; listing as empty"
                );
                Vec::new()
            },
            Err(err) => {
                self.corrupt_reads.fetch_add(1, Ordering::Relaxed);
                warn!(error = %err, "Malformed history slot; listing as empty");
                Vec::new()
            },
        }
    }

    async fn write_slot(&self, items: &[HistoryItem]) -> crate::Result<()> {
        let envelope = HistoryFile::new(items.to_vec());
        let bytes = serde_json::to_vec(&envelope)
            .map_err(|err| Error::storage("encoding history slot", err.into()))?;
        self.kv
            .set(HISTORY_SLOT, &bytes)
            .await
            .map_err(|err| Error::storage("writing history slot", err))
    }
}

/// Drops unpinned items whose age meets or exceeds the retention window,
/// returning the evicted items.
pub(crate) fn sweep_expired(items: &mut Vec<HistoryItem>, now_ms: i64) -> Vec<HistoryItem> {
    let mut evicted = Vec::new();
    items.retain(|item| {
        if item.is_pinned || now_ms - item.timestamp < RETENTION_WINDOW_MS {
            true
        } else {
            evicted.push(item.clone());
            false
        }
    });
    evicted
}

/// Sorts pinned items first, then by descending timestamp within each
/// pinned state.
pub(crate) fn sort_for_listing(items: &mut [HistoryItem]) {
    items.sort_by(|a, b| {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then(b.timestamp.cmp(&a.timestamp))
    });
}
