//! String-keyed slot store with pluggable backends.
//!
//! The history index persists its whole collection as one serialized value
//! under a single named slot; this module provides that store. Two backends
//! are included:
//!
//! - **RedbKvBackend**: persistent storage with ACID guarantees (default)
//! - **MemoryKvBackend**: fast, non-persistent storage for tests/embedding
//!
//! Values are raw bytes; callers own the encoding. There is no expiry at
//! this layer — retention of history items is pin-aware and belongs to the
//! index above.
//!
//! # Example
//!
//! ```ignore
//! use verdant::kv::KvStore;
//!
//! // In-memory (testing/embedding)
//! let store = KvStore::memory();
//! store.set("slot", b"value").await?;
//!
//! // Persistent (production)
//! let store = KvStore::file("~/.verdant/history.redb")?;
//! store.set("slot", b"value").await?;
//! ```

mod backend;
mod memory;
mod redb;
mod store;

#[cfg(test)]
mod tests;

pub use backend::KvBackend;
pub use memory::MemoryKvBackend;
pub use redb::RedbKvBackend;
pub use store::KvStore;
