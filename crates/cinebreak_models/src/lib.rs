//! Model and image transports for the cinebreak pipeline.
//!
//! Every transport implements one capability trait from `cinebreak_interface`:
//!
//! - [`GeminiTransport`] / [`GeminiImageTransport`] call the Gemini REST API directly
//! - [`ProxiedTransport`] / [`ProxiedImageTransport`] go through a backend that
//!   holds the key
//! - [`OpenAiCompatTransport`] targets chat-completions providers such as Groq
//! - [`PollinationsImageTransport`] builds keyless image URLs
//! - [`Throttled`] wraps any of them with a request quota
//!
//! # Example
//!
//! ```no_run
//! use cinebreak_core::{ScriptInput, StructuredRequest};
//! use cinebreak_interface::ModelTransport;
//! use cinebreak_models::GeminiTransport;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = GeminiTransport::from_env("gemini-1.5-flash")?;
//! let request = StructuredRequest::builder()
//!     .system_instruction("Return {\"ok\": true}")
//!     .content(ScriptInput::text("ping"))
//!     .response_schema(json!({"type": "OBJECT"}))
//!     .temperature(0.0_f32)
//!     .build()?;
//! let text = transport.generate(&request).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;
mod http;
mod openai_compat;
mod pollinations;
mod proxy;
mod throttle;

pub use gemini::{
    Candidate, Content, DEFAULT_GEMINI_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL,
    GEMINI_API_KEY_ENV, GeminiImageTransport, GeminiTransport, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, InlineData, Part, ResponseContent, ResponsePart,
};
pub use http::{build_http_client, provider_error_message};
pub use openai_compat::{GROQ_CHAT_URL, OPENROUTER_CHAT_URL, OpenAiCompatTransport};
pub use pollinations::{POLLINATIONS_URL, PollinationsImageTransport, PollinationsSettings};
pub use proxy::{ProxiedImageTransport, ProxiedTransport, ProxyRequest};
pub use throttle::{ThrottleSettings, ThrottleSettingsBuilder, Throttled};
