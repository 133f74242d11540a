//! Storyboard image generation.

use crate::BreakdownPipeline;
use cinebreak_core::{ImageHandle, ImageStyle};
use cinebreak_error::CinebreakResult;
use tracing::{info, instrument};

/// Prefix the prompt with the style text.
pub fn styled_prompt(prompt: &str, style: ImageStyle) -> String {
    format!("{}{}", style.prefix(), prompt)
}

impl BreakdownPipeline {
    /// Render a storyboard frame for `prompt` in `style`.
    ///
    /// # Errors
    ///
    /// `ImageError` (`NoImageProduced`) when the transport returns no image,
    /// `ProviderError` for transport failures.
    #[instrument(skip(self, prompt), fields(style = %style, provider = self.images.provider_name()))]
    pub async fn generate_image(&self, prompt: &str, style: ImageStyle) -> CinebreakResult<ImageHandle> {
        let handle = self.images.generate_image(&styled_prompt(prompt, style)).await?;
        info!(inline = matches!(handle, ImageHandle::DataUri(_)), "Storyboard frame ready");
        Ok(handle)
    }
}
