//! Redesign history: metadata index, composite engine, and supporting
//! types.
//!
//! The index keeps the ordered, retention-swept, pin-capped collection of
//! [`HistoryItem`] records; the engine layers the composite save/delete
//! protocol over the index and the image store.

mod clock;
mod engine;
mod index;
mod types;

#[cfg(test)]
mod property_tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{HistoryEngine, ImagePayload, NewRedesign};
pub use index::HistoryIndex;
pub use types::{
    DesignCatalog, Feature, HistoryItem, HydratedHistoryItem, ImageRef, LandscapingStyle, Plant,
};
