//! Chat-completions transport for OpenAI-compatible providers (Groq, OpenRouter).
//!
//! These providers have no native response schema, so the schema is appended to
//! the system message and JSON mode is requested where supported. Output is
//! validated downstream like any other transport.

use crate::http::{decode, send};
use async_trait::async_trait;
use cinebreak_core::{ScriptInput, StructuredRequest};
use cinebreak_error::{CinebreakResult, ProviderError, ProviderErrorKind};
use cinebreak_interface::ModelTransport;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Groq chat completions endpoint.
pub const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// OpenRouter chat completions endpoint.
pub const OPENROUTER_CHAT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// OpenAI-compatible chat transport.
#[derive(Debug, Clone)]
pub struct OpenAiCompatTransport {
    client: Client,
    api_key: String,
    model: String,
    url: String,
    provider: &'static str,
    json_mode: bool,
}

impl OpenAiCompatTransport {
    /// Create a transport for any chat-completions endpoint.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        url: impl Into<String>,
        provider: &'static str,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            url: url.into(),
            provider,
            json_mode: false,
        }
    }

    /// Groq, with JSON mode on.
    pub fn groq(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(api_key, model, GROQ_CHAT_URL, "groq").with_json_mode(true)
    }

    /// OpenRouter.
    pub fn openrouter(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(api_key, model, OPENROUTER_CHAT_URL, "openrouter")
    }

    /// Request `response_format: json_object`.
    pub fn with_json_mode(mut self, json_mode: bool) -> Self {
        self.json_mode = json_mode;
        self
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn system_message(request: &StructuredRequest) -> String {
        format!(
            "{}\n\nRespond ONLY with a JSON object matching this schema:\n{}",
            request.system_instruction(),
            request.response_schema()
        )
    }

    fn build_body<'a>(&'a self, request: &StructuredRequest) -> CinebreakResult<ChatRequest<'a>> {
        let user = match request.content() {
            ScriptInput::Text(text) => text.clone(),
            ScriptInput::Binary { mime_type, .. } => {
                return Err(ProviderError::new(ProviderErrorKind::Request(format!(
                    "{} does not accept {} documents; extract the text first",
                    self.provider, mime_type
                )))
                .into());
            }
        };

        Ok(ChatRequest {
            model: self.model.as_str(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(Self::system_message(request)),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(user),
                },
            ],
            temperature: *request.temperature(),
            max_tokens: MAX_TOKENS,
            response_format: self.json_mode.then_some(ResponseFormat { kind: "json_object" }),
        })
    }

    fn parse_response(&self, body: &str) -> CinebreakResult<String> {
        let response: ChatResponse = decode(body, self.provider)?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyResponse).into())
    }
}

#[async_trait]
impl ModelTransport for OpenAiCompatTransport {
    #[instrument(skip(self, request), fields(provider = self.provider, model = %self.model))]
    async fn generate(&self, request: &StructuredRequest) -> CinebreakResult<String> {
        let body = self.build_body(request)?;
        debug!(json_mode = self.json_mode, "Sending chat completion");
        let builder = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body);
        let text = send(builder, self.provider).await?;
        self.parse_response(&text)
    }

    fn provider_name(&self) -> &'static str {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
