//! Core types for redesign history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::HISTORY_FORMAT_VERSION;

/// Landscaping styles a redesign can be requested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandscapingStyle {
    Modern,
    Minimalist,
    Rustic,
    Mediterranean,
    Japanese,
    Tropical,
}

impl LandscapingStyle {
    /// Human-readable name for display surfaces.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Modern => "Modern",
            Self::Minimalist => "Minimalist",
            Self::Rustic => "Rustic",
            Self::Mediterranean => "Mediterranean",
            Self::Japanese => "Japanese Garden",
            Self::Tropical => "Tropical",
        }
    }
}

impl fmt::Display for LandscapingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A plant suggested by the redesign provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plant {
    pub name: String,
    pub species: String,
}

/// A hardscape or planting feature suggested by the redesign provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feature {
    pub name: String,
    pub description: String,
}

/// Structured list of plants and features for one redesign, supplied by
/// the provider and stored verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DesignCatalog {
    #[serde(default)]
    pub plants: Vec<Plant>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// Reference to an image payload held in the image store.
///
/// The index owns these references but not the bytes; resolving one goes
/// through [`crate::images::ImageStore::get`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRef {
    /// Id of the record in the image store.
    pub id: String,
    /// MIME type of the referenced payload.
    pub mime_type: String,
    /// Original upload filename, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One completed redesign: metadata only, image bytes live in the image
/// store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryItem {
    /// Unique id, assigned at creation and never changed.
    pub id: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Whether the item is exempt from the retention sweep.
    pub is_pinned: bool,
    /// Style the redesign was requested in.
    pub style: LandscapingStyle,
    /// Climate zone supplied with the request; may be empty.
    pub climate_zone: String,
    /// Plants and features the provider returned.
    pub design_catalog: DesignCatalog,
    /// Reference to the uploaded photo.
    pub original_image: ImageRef,
    /// Reference to the generated redesign.
    pub redesigned_image: ImageRef,
}

impl HistoryItem {
    /// Creation time as a UTC datetime, for display surfaces.
    ///
    /// Returns `None` for timestamps outside chrono's representable range.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Versioned on-disk envelope for the persisted history collection.
///
/// The version field exists so a future format change can be migrated by
/// matching on it instead of silently misreading old data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct HistoryFile {
    pub version: u32,
    pub items: Vec<HistoryItem>,
}

impl HistoryFile {
    pub(crate) fn new(items: Vec<HistoryItem>) -> Self {
        Self {
            version: HISTORY_FORMAT_VERSION,
            items,
        }
    }
}

/// A history item with both image payloads resolved from the image store.
#[derive(Debug, Clone)]
pub struct HydratedHistoryItem {
    pub item: HistoryItem,
    pub original: crate::images::StoredImage,
    pub redesigned: crate::images::StoredImage,
}

impl HydratedHistoryItem {
    /// `data:` URL for the redesigned payload, ready for an `img` element.
    pub fn redesigned_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.redesigned.mime_type, self.redesigned.base64
        )
    }

    /// `data:` URL for the original payload.
    pub fn original_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.original.mime_type, self.original.base64
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_serializes_lowercase() {
        let json = serde_json::to_string(&LandscapingStyle::Japanese).unwrap();
        assert_eq!(json, r#""japanese""#);

        let style: LandscapingStyle = serde_json::from_str(r#""mediterranean""#).unwrap();
        assert_eq!(style, LandscapingStyle::Mediterranean);
    }

    #[test]
    fn test_image_ref_name_omitted_when_absent() {
        let without_name = ImageRef {
            id: "a".to_string(),
            mime_type: "image/png".to_string(),
            name: None,
        };
        let json = serde_json::to_string(&without_name).unwrap();
        assert!(!json.contains("name"));

        let round_trip: ImageRef = serde_json::from_str(&json).unwrap();
        assert_eq!(round_trip, without_name);
    }

    #[test]
    fn test_envelope_carries_current_version() {
        let envelope = HistoryFile::new(Vec::new());
        assert_eq!(envelope.version, HISTORY_FORMAT_VERSION);

        let json = serde_json::to_vec(&envelope).unwrap();
        let decoded: HistoryFile = serde_json::from_slice(&json).unwrap();
        assert_eq!(decoded.version, HISTORY_FORMAT_VERSION);
        assert!(decoded.items.is_empty());
    }

    #[test]
    fn test_catalog_fields_default_empty() {
        let catalog: DesignCatalog = serde_json::from_str("{}").unwrap();
        assert!(catalog.plants.is_empty());
        assert!(catalog.features.is_empty());
    }
}
