//! Structured text generation over the Gemini REST API.

use super::{API_KEY_HEADER, DEFAULT_GEMINI_BASE_URL, GEMINI_API_KEY_ENV, api_key_from_env, endpoint};
use crate::gemini::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};
use crate::http::{decode, send};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cinebreak_core::{ScriptInput, StructuredRequest};
use cinebreak_error::{CinebreakResult, ProviderError, ProviderErrorKind};
use cinebreak_interface::ModelTransport;
use reqwest::Client;
use tracing::{debug, instrument, warn};

/// Text model used when none is configured.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-1.5-flash";

/// Direct Gemini transport.
///
/// Binary script payloads travel as base64 `inlineData` parts; text payloads as
/// plain text parts. The response schema and temperature go in
/// `generationConfig` with `responseMimeType: application/json`.
#[derive(Clone)]
pub struct GeminiTransport {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiTransport {
    /// Create a transport with an explicit key.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        debug!(model = %model, "Creating Gemini transport");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model,
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

    /// Point the transport at another API root (e.g., a regional endpoint).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Map a structured request onto the `generateContent` body.
    pub fn build_request(request: &StructuredRequest) -> GenerateContentRequest {
        let part = match request.content() {
            ScriptInput::Text(text) => Part::text(text.clone()),
            ScriptInput::Binary { data, mime_type } => {
                Part::inline(mime_type.clone(), STANDARD.encode(data))
            }
        };

        GenerateContentRequest {
            contents: vec![Content::user(vec![part])],
            system_instruction: Some(Content::text(request.system_instruction().clone())),
            generation_config: Some(GenerationConfig {
                temperature: Some(*request.temperature()),
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(request.response_schema().clone()),
                response_modalities: None,
            }),
        }
    }

    /// Extract the answer text from a `generateContent` response body.
    ///
    /// # Errors
    ///
    /// `Decode` if the body is not a response, `EmptyResponse` if it has no text.
    pub fn parse_response(body: &str) -> CinebreakResult<String> {
        let response: GenerateContentResponse = decode(body, "gemini")?;
        response.text().ok_or_else(|| {
            warn!(
                finish_reason = ?response.finish_reason(),
                blocked = response.prompt_feedback.is_some(),
                "Gemini returned no text"
            );
            ProviderError::new(ProviderErrorKind::EmptyResponse).into()
        })
    }
}

impl std::fmt::Debug for GeminiTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiTransport")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ModelTransport for GeminiTransport {
    #[instrument(
        skip(self, request),
        fields(provider = "gemini", model = %request.model().as_deref().unwrap_or(&self.model))
    )]
    async fn generate(&self, request: &StructuredRequest) -> CinebreakResult<String> {
        let model = request.model().as_deref().unwrap_or(&self.model);
        let body = Self::build_request(request);
        debug!(mime = request.content().mime_type(), "Sending generateContent");

        let url = endpoint(&self.base_url, model);
        let builder = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body);
        let text = send(builder, "gemini").await?;
        Self::parse_response(&text)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
