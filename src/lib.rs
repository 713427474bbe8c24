//! verdant — local-first history engine for AI landscape redesigns.
//!
//! Applications that generate redesigns of outdoor spaces need somewhere to
//! keep the results: the generated images, the design catalog that came back
//! with them, and a browsable, pinnable history. verdant provides that store
//! as an embedded library with no server component:
//!
//! - [`history::HistoryIndex`] — an ordered metadata index with a retention
//!   sweep (unpinned items expire after seven days) and a pin cap (at most
//!   seven items pinned at once), persisted as a single versioned JSON slot.
//! - [`images::ImageStore`] — an id-keyed store for base64 image payloads
//!   with ACID guarantees via redb.
//! - [`history::HistoryEngine`] — the composite protocol that keeps the two
//!   consistent: saving a redesign writes both image payloads before the
//!   metadata record, deleting cascades to both payloads.
//!
//! The AI provider that produces redesigns is consumed through the
//! [`provider::RedesignProvider`] trait; network implementations live
//! outside this crate.
//!
//! # Example
//!
//! ```ignore
//! use verdant::config::Config;
//! use verdant::history::HistoryEngine;
//!
//! let engine = HistoryEngine::open(&Config::load_or_default())?;
//! let items = engine.list().await;
//! for item in &items {
//!     println!("{} {} ({})", item.id, item.style, item.climate_zone);
//! }
//! ```
//!
//! All storage operations are async; blocking database work runs on the
//! tokio blocking pool. The engine assumes a single logical writer — see
//! [`history::HistoryIndex`] for the concurrency caveats.

#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod error;
pub mod history;
pub mod images;
pub mod kv;
pub mod paths;
pub mod provider;

pub use error::{Error, Result};
pub use history::{HistoryEngine, HistoryItem, ImagePayload, NewRedesign};
pub use images::StoredImage;

/// Initializes a `tracing` subscriber for applications that embed verdant.
///
/// Honors `RUST_LOG` via the standard env filter, defaulting to `info`.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
