//! Schema-constrained generation requests.

use crate::ScriptInput;
use cinebreak_error::{BuilderError, CinebreakResult};

/// One call to a text model whose output must match a response schema.
///
/// # Examples
///
/// ```
/// use cinebreak_core::{ScriptInput, StructuredRequest};
/// use serde_json::json;
///
/// let request = StructuredRequest::builder()
///     .system_instruction("Extract the scenes.")
///     .content(ScriptInput::text("INT. CASA - DIA"))
///     .response_schema(json!({"type": "OBJECT"}))
///     .temperature(0.4_f32)
///     .build()
///     .unwrap();
///
/// assert_eq!(*request.temperature(), 0.4_f32);
/// assert!(request.model().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into), build_fn(private, name = "build_inner"))]
pub struct StructuredRequest {
    /// Instruction framing the task
    system_instruction: String,
    /// Text or binary payload
    content: ScriptInput,
    /// Response schema handed to the provider
    response_schema: serde_json::Value,
    /// Sampling temperature
    temperature: f32,
    /// Model override; the transport default is used when absent
    #[builder(default, setter(strip_option, into))]
    model: Option<String>,
}

impl StructuredRequest {
    /// Start building a request.
    pub fn builder() -> StructuredRequestBuilder {
        StructuredRequestBuilder::default()
    }
}

impl StructuredRequestBuilder {
    /// Build the request.
    ///
    /// # Errors
    ///
    /// Returns a `BuilderError` when a required field was not set.
    pub fn build(&self) -> CinebreakResult<StructuredRequest> {
        self.build_inner()
            .map_err(|e| BuilderError::from(e.to_string()).into())
    }
}
