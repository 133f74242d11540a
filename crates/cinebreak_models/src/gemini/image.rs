//! Image generation over the Gemini REST API.

use super::{API_KEY_HEADER, DEFAULT_GEMINI_BASE_URL, GEMINI_API_KEY_ENV, api_key_from_env, endpoint};
use crate::gemini::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};
use crate::http::{decode, send};
use async_trait::async_trait;
use cinebreak_core::ImageHandle;
use cinebreak_error::{CinebreakResult, ImageError, ImageErrorKind};
use cinebreak_interface::ImageTransport;
use reqwest::Client;
use tracing::{debug, instrument, warn};

/// Image model used when none is configured.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

/// Gemini image transport. The first inline image part becomes a data URI.
#[derive(Clone)]
pub struct GeminiImageTransport {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiImageTransport {
    /// Create a transport with an explicit key.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }

    /// Create a transport reading the key from `GEMINI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderErrorKind::MissingApiKey` if the variable is unset or blank.
    pub fn from_env(model: impl Into<String>) -> CinebreakResult<Self> {
        Ok(Self::new(api_key_from_env(GEMINI_API_KEY_ENV)?, model))
    }

    /// Point the transport at another API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Model identifier.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Request body asking for image output.
    pub fn build_request(prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_string(), "TEXT".to_string()]),
                ..Default::default()
            }),
        }
    }

    /// Turn a response body into an image handle.
    ///
    /// # Errors
    ///
    /// `Decode` if the body is not a response, `NoImageProduced` if it has no
    /// inline image.
    pub fn parse_response(body: &str) -> CinebreakResult<ImageHandle> {
        let response: GenerateContentResponse = decode(body, "gemini")?;
        match response.first_inline_data() {
            Some(inline) if !inline.data.is_empty() => {
                Ok(ImageHandle::from_base64(&inline.mime_type, &inline.data))
            }
            _ => {
                warn!(finish_reason = ?response.finish_reason(), "No image in Gemini response");
                Err(ImageError::new(ImageErrorKind::NoImageProduced).into())
            }
        }
    }
}

impl std::fmt::Debug for GeminiImageTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiImageTransport")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ImageTransport for GeminiImageTransport {
    #[instrument(skip(self, prompt), fields(provider = "gemini", model = %self.model, prompt_len = prompt.len()))]
    async fn generate_image(&self, prompt: &str) -> CinebreakResult<ImageHandle> {
        let body = Self::build_request(prompt);
        let url = endpoint(&self.base_url, &self.model);
        let builder = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body);
        let text = send(builder, "gemini").await?;
        let handle = Self::parse_response(&text)?;
        debug!("Image generated");
        Ok(handle)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
