//! Tunables for the three generation stages.

use crate::MatchStrategy;
use serde::{Deserialize, Serialize};

/// Stage settings.
///
/// Defaults reproduce the production prompts: Brazilian Portuguese output,
/// temperatures 0.4 / 0.5 / 0.3 and whole-word character matching.
///
/// # Examples
///
/// ```
/// use cinebreak_pipeline::{MatchStrategy, PipelineSettings};
///
/// let settings = PipelineSettings::builder()
///     .shots_temperature(0.7_f32)
///     .matcher(MatchStrategy::Exact)
///     .build()
///     .unwrap();
/// assert_eq!(*settings.shots_temperature(), 0.7);
/// assert_eq!(*settings.structure_temperature(), 0.4);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_builder::Builder,
    derive_getters::Getters,
)]
#[serde(default)]
#[builder(setter(into), default)]
pub struct PipelineSettings {
    /// Language for human-readable fields (descriptions, summaries, props)
    output_language: String,
    /// Shown in the character block when no actor is cast
    actor_placeholder: String,
    /// Temperature for structure analysis
    structure_temperature: f32,
    /// Temperature for shot generation
    shots_temperature: f32,
    /// Temperature for consistency repair
    repair_temperature: f32,
    /// Registry-to-scene character matching
    matcher: MatchStrategy,
    /// Model override applied to every text request
    #[builder(setter(strip_option))]
    model: Option<String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            output_language: "PORTUGUÊS (PT-BR)".to_string(),
            actor_placeholder: "Ator não definido".to_string(),
            structure_temperature: 0.4,
            shots_temperature: 0.5,
            repair_temperature: 0.3,
            matcher: MatchStrategy::default(),
            model: None,
        }
    }
}

impl PipelineSettings {
    /// Start building settings from the defaults.
    pub fn builder() -> PipelineSettingsBuilder {
        PipelineSettingsBuilder::default()
    }
}
