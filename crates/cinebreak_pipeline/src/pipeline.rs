//! The stage runner shared by the coordinator and direct callers.

use crate::{CharacterMatcher, PipelineSettings};
use cinebreak_core::{ScriptInput, StructuredRequest};
use cinebreak_error::CinebreakResult;
use cinebreak_interface::{ImageTransport, ModelTransport};
use serde_json::Value;
use std::sync::Arc;

/// Runs the generation stages against injected transports.
///
/// Stages never look at the environment; switching between a direct provider
/// and a proxy is a matter of which transport is passed in here.
#[derive(Clone)]
pub struct BreakdownPipeline {
    pub(crate) model: Arc<dyn ModelTransport>,
    pub(crate) images: Arc<dyn ImageTransport>,
    pub(crate) settings: PipelineSettings,
    pub(crate) matcher: CharacterMatcher,
}

impl BreakdownPipeline {
    /// Create a pipeline.
    pub fn new(
        model: Arc<dyn ModelTransport>,
        images: Arc<dyn ImageTransport>,
        settings: PipelineSettings,
    ) -> Self {
        let matcher = CharacterMatcher::new(*settings.matcher());
        Self {
            model,
            images,
            settings,
            matcher,
        }
    }

    /// Active settings.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Character matcher built from the settings.
    pub fn matcher(&self) -> CharacterMatcher {
        self.matcher
    }

    /// Text transport.
    pub fn model(&self) -> &Arc<dyn ModelTransport> {
        &self.model
    }

    /// Image transport.
    pub fn images(&self) -> &Arc<dyn ImageTransport> {
        &self.images
    }

    pub(crate) fn request(
        &self,
        system_instruction: String,
        content: ScriptInput,
        schema: Value,
        temperature: f32,
    ) -> CinebreakResult<StructuredRequest> {
        let mut builder = StructuredRequest::builder();
        builder
            .system_instruction(system_instruction)
            .content(content)
            .response_schema(schema)
            .temperature(temperature);
        if let Some(model) = self.settings.model() {
            builder.model(model.clone());
        }
        builder.build()
    }
}

impl std::fmt::Debug for BreakdownPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreakdownPipeline")
            .field("provider", &self.model.provider_name())
            .field("model", &self.model.model_name())
            .field("images", &self.images.provider_name())
            .field("settings", &self.settings)
            .finish()
    }
}
