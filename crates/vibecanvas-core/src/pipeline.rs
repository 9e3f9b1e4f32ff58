//! The two-step generation pipeline
//!
//! `vibe -> VibeMetadata -> VibeResult`. The image prompt is built from the
//! metadata, so the image step only runs after the metadata step succeeded.

use async_trait::async_trait;
use log::info;

use crate::error::{GenerateError, ImageError, MetadataError};
use crate::gemini::GeminiClient;
use crate::vibe::{VibeMetadata, VibeResult};

/// A model backend able to run both generation steps
#[async_trait]
pub trait VibeModel: Send + Sync {
    async fn generate_metadata(&self, vibe: &str) -> Result<VibeMetadata, MetadataError>;

    /// Returns the image as a data URI
    async fn generate_image(
        &self,
        vibe: &str,
        metadata: &VibeMetadata,
    ) -> Result<String, ImageError>;
}

#[async_trait]
impl VibeModel for GeminiClient {
    async fn generate_metadata(&self, vibe: &str) -> Result<VibeMetadata, MetadataError> {
        GeminiClient::generate_metadata(self, vibe).await
    }

    async fn generate_image(
        &self,
        vibe: &str,
        metadata: &VibeMetadata,
    ) -> Result<String, ImageError> {
        GeminiClient::generate_image(self, vibe, metadata).await
    }
}

/// Run both steps in order and merge them into one result
pub async fn generate<M: VibeModel + ?Sized>(
    model: &M,
    vibe: &str,
) -> Result<VibeResult, GenerateError> {
    let metadata = model.generate_metadata(vibe).await?;
    info!(
        "Metadata ready: {:?} with {} colors",
        metadata.title,
        metadata.palette.len()
    );

    let image_url = model.generate_image(vibe, &metadata).await?;
    Ok(VibeResult::new(metadata, image_url))
}
