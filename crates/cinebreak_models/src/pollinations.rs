//! Keyless image URLs from Pollinations.
//!
//! The provider renders on first fetch, so producing a handle needs no request.

use async_trait::async_trait;
use cinebreak_core::ImageHandle;
use cinebreak_error::{
    CinebreakResult, ImageError, ImageErrorKind, ProviderError, ProviderErrorKind,
};
use cinebreak_interface::ImageTransport;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Pollinations prompt endpoint.
pub const POLLINATIONS_URL: &str = "https://image.pollinations.ai/prompt/";

/// Rendering options appended as query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollinationsSettings {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Fixed seed; the provider picks one when absent
    pub seed: Option<u64>,
    /// Provider model ("flux" or "turbo")
    pub model: String,
    /// Suppress the provider watermark
    pub nologo: bool,
}

impl Default for PollinationsSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            seed: None,
            model: "flux".to_string(),
            nologo: true,
        }
    }
}

/// Image transport returning Pollinations URLs.
#[derive(Debug, Clone, Default)]
pub struct PollinationsImageTransport {
    settings: PollinationsSettings,
}

impl PollinationsImageTransport {
    /// Create a transport with the given options.
    pub fn new(settings: PollinationsSettings) -> Self {
        Self { settings }
    }

    /// Build the image URL for a prompt.
    ///
    /// # Errors
    ///
    /// `NoImageProduced` for a blank prompt.
    pub fn url_for(&self, prompt: &str) -> CinebreakResult<String> {
        if prompt.trim().is_empty() {
            return Err(ImageError::new(ImageErrorKind::NoImageProduced).into());
        }

        let mut url = Url::parse(POLLINATIONS_URL).map_err(|e| {
            ProviderError::new(ProviderErrorKind::Request(format!("bad base URL: {}", e)))
        })?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(prompt);
        }
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("width", &self.settings.width.to_string())
                .append_pair("height", &self.settings.height.to_string());
            if let Some(seed) = self.settings.seed {
                query.append_pair("seed", &seed.to_string());
            }
            query
                .append_pair("model", &self.settings.model)
                .append_pair("nologo", &self.settings.nologo.to_string());
        }
        Ok(url.into())
    }
}

#[async_trait]
impl ImageTransport for PollinationsImageTransport {
    #[instrument(skip(self, prompt), fields(provider = "pollinations", prompt_len = prompt.len()))]
    async fn generate_image(&self, prompt: &str) -> CinebreakResult<ImageHandle> {
        let url = self.url_for(prompt)?;
        debug!(url = %url, "Built image URL");
        Ok(ImageHandle::Url(url))
    }

    fn provider_name(&self) -> &'static str {
        "pollinations"
    }
}
