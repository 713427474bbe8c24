//! Seam for the external AI redesign collaborator.
//!
//! The engine never talks to a model endpoint directly; it goes through
//! [`RedesignProvider`], and the application supplies whatever transport it
//! uses (HTTP client, SDK, test fake). This crate deliberately ships no
//! network implementation.

use anyhow::Result;
use async_trait::async_trait;

use crate::history::{DesignCatalog, LandscapingStyle};

/// Inputs for one redesign request.
#[derive(Debug, Clone)]
pub struct RedesignRequest {
    /// Base64-encoded photo of the outdoor space.
    pub image_base64: String,
    /// MIME type of the photo.
    pub mime_type: String,
    /// Requested landscaping style.
    pub style: LandscapingStyle,
    /// Whether the provider may alter structures (walls, decks, paths)
    /// rather than planting only.
    pub allow_structural_changes: bool,
    /// Climate zone hint; may be empty.
    pub climate_zone: String,
}

/// A completed redesign as returned by the provider.
#[derive(Debug, Clone)]
pub struct RedesignOutcome {
    /// Base64-encoded generated image.
    pub image_base64: String,
    /// MIME type of the generated image.
    pub mime_type: String,
    /// Plants and features the provider chose.
    pub catalog: DesignCatalog,
}

/// An AI collaborator that turns a photo into a redesigned image plus a
/// design catalog.
#[async_trait]
pub trait RedesignProvider: Send + Sync + 'static {
    /// Produces a redesign for the given request.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot produce a redesign; the
    /// engine surfaces it without recording anything.
    async fn redesign(&self, request: &RedesignRequest) -> Result<RedesignOutcome>;
}
