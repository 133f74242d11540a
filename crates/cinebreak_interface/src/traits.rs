//! Trait definitions for generation backends and project persistence.

use crate::ProjectSnapshot;
use async_trait::async_trait;
use cinebreak_core::{ImageHandle, StructuredRequest};
use cinebreak_error::CinebreakResult;
use uuid::Uuid;

/// Schema-constrained text generation.
///
/// Implementations perform exactly one provider call per invocation: no retry,
/// no caching. Provider failures surface as `ProviderError` with the provider's
/// status and message untouched.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    /// Run the request and return the raw response text.
    ///
    /// Returns `ProviderErrorKind::EmptyResponse` when the model produced no text.
    async fn generate(&self, request: &StructuredRequest) -> CinebreakResult<String>;

    /// Provider name (e.g., "gemini", "proxy").
    fn provider_name(&self) -> &'static str;

    /// Model identifier used when a request carries no override.
    fn model_name(&self) -> &str;
}

/// Image generation from a fully composed prompt.
///
/// The style prefix is already applied by the caller.
#[async_trait]
pub trait ImageTransport: Send + Sync {
    /// Render the prompt and return a handle to the image.
    ///
    /// Returns `ImageErrorKind::NoImageProduced` when the response carries no image.
    async fn generate_image(&self, prompt: &str) -> CinebreakResult<ImageHandle>;

    /// Provider name (e.g., "gemini", "pollinations").
    fn provider_name(&self) -> &'static str;
}

/// Bounded project history.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// All snapshots, newest first.
    async fn load_all(&self) -> CinebreakResult<Vec<ProjectSnapshot>>;

    /// Insert a snapshot, replacing any entry with the same title.
    async fn save(&self, snapshot: ProjectSnapshot) -> CinebreakResult<()>;

    /// Fetch a snapshot by id.
    async fn get(&self, id: Uuid) -> CinebreakResult<Option<ProjectSnapshot>> {
        Ok(self.load_all().await?.into_iter().find(|s| s.id == id))
    }

    /// Remove a snapshot by id. Returns whether anything was removed.
    async fn delete(&self, id: Uuid) -> CinebreakResult<bool>;
}
