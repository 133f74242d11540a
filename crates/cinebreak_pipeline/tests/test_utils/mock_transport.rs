//! Mock transports for testing.

use async_trait::async_trait;
use cinebreak_core::{ImageHandle, ScriptInput, StructuredRequest};
use cinebreak_error::{
    CinebreakError, CinebreakResult, ImageError, ImageErrorKind, ProviderError, ProviderErrorKind,
};
use cinebreak_interface::{ImageTransport, ModelTransport};
use std::sync::{Arc, Mutex};

/// A single mock response (success or error).
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(String),
    Error(ProviderErrorKind),
}

type Handler = Arc<dyn Fn(&StructuredRequest) -> MockResponse + Send + Sync>;

/// Behavior configuration for mock responses.
#[derive(Clone)]
pub enum MockBehavior {
    /// Always return success with the given text
    Success(String),
    /// Always return the specified error
    Error(ProviderErrorKind),
    /// Return a sequence of responses, repeating the last one
    Sequence(Vec<MockResponse>),
    /// Compute the response from the request
    Handler(Handler),
}

/// Mock text transport.
///
/// Records every request so tests can assert on prompts, payloads and
/// temperatures without making API calls.
pub struct MockTransport {
    behavior: MockBehavior,
    call_count: Arc<Mutex<usize>>,
    requests: Arc<Mutex<Vec<StructuredRequest>>>,
}

impl MockTransport {
    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(Mutex::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always succeeds with the given text.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::new_with_behavior(MockBehavior::Success(text.into()))
    }

    /// Always fails with the given error.
    pub fn new_error(error: ProviderErrorKind) -> Self {
        Self::new_with_behavior(MockBehavior::Error(error))
    }

    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self::new_with_behavior(MockBehavior::Sequence(responses))
    }

    pub fn new_handler(
        handler: impl Fn(&StructuredRequest) -> MockResponse + Send + Sync + 'static,
    ) -> Self {
        Self::new_with_behavior(MockBehavior::Handler(Arc::new(handler)))
    }

    /// Number of times generate() was called.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Requests seen so far, in call order.
    pub fn requests(&self) -> Vec<StructuredRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> StructuredRequest {
        self.requests().pop().expect("no request recorded")
    }

    fn next_response(&self, request: &StructuredRequest) -> MockResponse {
        let current = {
            let mut count = self.call_count.lock().unwrap();
            let current = *count;
            *count += 1;
            current
        };
        self.requests.lock().unwrap().push(request.clone());

        match &self.behavior {
            MockBehavior::Success(text) => MockResponse::Success(text.clone()),
            MockBehavior::Error(kind) => MockResponse::Error(kind.clone()),
            MockBehavior::Sequence(responses) => responses
                .get(current)
                .or_else(|| responses.last())
                .cloned()
                .unwrap_or(MockResponse::Error(ProviderErrorKind::EmptyResponse)),
            MockBehavior::Handler(handler) => handler(request),
        }
    }
}

#[async_trait]
impl ModelTransport for MockTransport {
    async fn generate(&self, request: &StructuredRequest) -> CinebreakResult<String> {
        match self.next_response(request) {
            MockResponse::Success(text) => Ok(text),
            MockResponse::Error(kind) => Err(CinebreakError::from(ProviderError::new(kind))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Text content of a request, empty for binary payloads.
pub fn request_text(request: &StructuredRequest) -> String {
    match request.content() {
        ScriptInput::Text(text) => text.clone(),
        ScriptInput::Binary { .. } => String::new(),
    }
}

/// Mock image transport.
pub struct MockImages {
    fail: bool,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockImages {
    pub fn new() -> Self {
        Self {
            fail: false,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Never produces an image.
    pub fn failing() -> Self {
        Self {
            fail: true,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageTransport for MockImages {
    async fn generate_image(&self, prompt: &str) -> CinebreakResult<ImageHandle> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(ImageError::new(ImageErrorKind::NoImageProduced).into());
        }
        Ok(ImageHandle::from_base64("image/png", "bW9jaw=="))
    }

    fn provider_name(&self) -> &'static str {
        "mock-images"
    }
}
