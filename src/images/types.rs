//! Types for the image store.

use serde::{Deserialize, Serialize};

/// A stored image payload.
///
/// Payloads are kept base64-encoded end to end: they arrive that way from
/// the redesign provider and leave that way toward `data:` URLs, so the
/// store never decodes them. One record is independent of every other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredImage {
    /// Caller-assigned id (e.g. `history_1723000000000_original`).
    pub id: String,
    /// Base64-encoded image bytes.
    pub base64: String,
    /// MIME type (e.g. "image/jpeg", "image/png").
    pub mime_type: String,
}
