//! Transports that call a backend proxy holding the provider key.
//!
//! The backend accepts `POST {endpoint}` with `{"action": ..., "payload": ...}`
//! and an optional `X-API-Key` header carrying a user-supplied key. Failures
//! come back as non-2xx with `{"error": "..."}`.

use crate::gemini::Part;
use crate::http::{decode, send};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cinebreak_core::{ImageHandle, ScriptInput, StructuredRequest};
use cinebreak_error::{CinebreakResult, ImageError, ImageErrorKind, ProviderError, ProviderErrorKind};
use cinebreak_interface::{ImageTransport, ModelTransport};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

const API_KEY_HEADER: &str = "X-API-Key";

/// Envelope sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyRequest {
    /// Backend action name
    pub action: String,
    /// Action-specific payload
    pub payload: serde_json::Value,
}

impl ProxyRequest {
    /// Envelope for a structured generation call.
    pub fn structured(request: &StructuredRequest) -> Self {
        let content = match request.content() {
            ScriptInput::Text(text) => Part::text(text.clone()),
            ScriptInput::Binary { data, mime_type } => {
                Part::inline(mime_type.clone(), STANDARD.encode(data))
            }
        };
        let mut payload = json!({
            "systemInstruction": request.system_instruction(),
            "content": content,
            "responseSchema": request.response_schema(),
            "temperature": request.temperature(),
        });
        if let Some(model) = request.model() {
            payload["model"] = json!(model);
        }
        Self {
            action: "generateStructured".to_string(),
            payload,
        }
    }

    /// Envelope for an image call.
    pub fn image(prompt: &str) -> Self {
        Self {
            action: "generateImage".to_string(),
            payload: json!({ "prompt": prompt }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TextReply {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageReply {
    #[serde(default)]
    image: Option<String>,
}

#[derive(Debug, Clone)]
struct ProxyClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl ProxyClient {
    async fn call(&self, request: &ProxyRequest) -> CinebreakResult<String> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        send(builder, "proxy").await
    }
}

/// Structured generation through the backend proxy.
#[derive(Debug, Clone)]
pub struct ProxiedTransport {
    inner: ProxyClient,
    model: String,
}

impl ProxiedTransport {
    /// Create a transport for `endpoint`; the backend supplies its own key
    /// unless [`ProxiedTransport::with_api_key`] is used.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            inner: ProxyClient {
                client: Client::new(),
                endpoint: endpoint.into(),
                api_key: None,
            },
            model: "backend-default".to_string(),
        }
    }

    /// Forward a user key in the `X-API-Key` header.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.inner.api_key = Some(api_key.into());
        self
    }

    /// Name the model the backend runs, for logs.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.inner.client = client;
        self
    }

    /// Extract the generated text from a backend reply.
    ///
    /// # Errors
    ///
    /// `Decode` if the body is not a reply, `EmptyResponse` if `text` is missing
    /// or blank.
    pub fn parse_response(body: &str) -> CinebreakResult<String> {
        let reply: TextReply = decode(body, "proxy")?;
        reply
            .text
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyResponse).into())
    }
}

#[async_trait]
impl ModelTransport for ProxiedTransport {
    #[instrument(skip(self, request), fields(provider = "proxy", endpoint = %self.inner.endpoint))]
    async fn generate(&self, request: &StructuredRequest) -> CinebreakResult<String> {
        let envelope = ProxyRequest::structured(request);
        debug!(action = %envelope.action, "Calling backend");
        let body = self.inner.call(&envelope).await?;
        Self::parse_response(&body)
    }

    fn provider_name(&self) -> &'static str {
        "proxy"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Image generation through the backend proxy.
#[derive(Debug, Clone)]
pub struct ProxiedImageTransport {
    inner: ProxyClient,
}

impl ProxiedImageTransport {
    /// Create a transport for `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            inner: ProxyClient {
                client: Client::new(),
                endpoint: endpoint.into(),
                api_key: None,
            },
        }
    }

    /// Forward a user key in the `X-API-Key` header.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.inner.api_key = Some(api_key.into());
        self
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.inner.client = client;
        self
    }

    /// Extract the image handle from a backend reply.
    ///
    /// # Errors
    ///
    /// `Decode` if the body is not a reply, `NoImageProduced` if `image` is
    /// missing or blank.
    pub fn parse_response(body: &str) -> CinebreakResult<ImageHandle> {
        let reply: ImageReply = decode(body, "proxy")?;
        reply
            .image
            .filter(|image| !image.trim().is_empty())
            .map(ImageHandle::parse)
            .ok_or_else(|| ImageError::new(ImageErrorKind::NoImageProduced).into())
    }
}

#[async_trait]
impl ImageTransport for ProxiedImageTransport {
    #[instrument(skip(self, prompt), fields(provider = "proxy", endpoint = %self.inner.endpoint))]
    async fn generate_image(&self, prompt: &str) -> CinebreakResult<ImageHandle> {
        let body = self.inner.call(&ProxyRequest::image(prompt)).await?;
        Self::parse_response(&body)
    }

    fn provider_name(&self) -> &'static str {
        "proxy"
    }
}
