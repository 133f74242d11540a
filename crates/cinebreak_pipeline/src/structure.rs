//! Stage 1: screenplay to breakdown document.

use crate::extraction::parse_response;
use crate::prompts::structure_instruction;
use crate::schema::{StructureSchema, describe_violations};
use crate::BreakdownPipeline;
use cinebreak_core::{BreakdownDocument, ScriptInput};
use cinebreak_error::{CinebreakResult, MalformedOutputError, MalformedOutputKind, OutputStage};
use tracing::{debug, error, info, instrument};

impl BreakdownPipeline {
    /// Extract scenes, characters, props and locations from a screenplay.
    ///
    /// Every scene of the result has an empty shot list.
    ///
    /// # Errors
    ///
    /// - `InputError` for a blank or empty payload, before any call
    /// - `ProviderError` from the transport, untouched
    /// - `MalformedOutputError` for invalid JSON, a missing top-level key or
    ///   any schema violation; there is no partial recovery
    #[instrument(skip(self, input), fields(mime = input.mime_type()))]
    pub async fn analyze_structure(&self, input: &ScriptInput) -> CinebreakResult<BreakdownDocument> {
        input.ensure_not_empty()?;

        let request = self.request(
            structure_instruction(self.settings.output_language()),
            input.clone(),
            StructureSchema::schema(),
            *self.settings.structure_temperature(),
        )?;

        debug!("Requesting structure analysis");
        let text = self.model.generate(&request).await?;
        let document = parse_structure(&text)?;

        info!(
            title = %document.title,
            scenes = document.scenes.len(),
            characters = document.characters.len(),
            "Structure analysis complete"
        );
        Ok(document)
    }
}

/// Parse and validate a structure analysis response.
///
/// # Errors
///
/// Returns `MalformedOutputError` (stage `Structure`) if the response is not
/// JSON, lacks `scenes`, `characters_metadata` or `unique_locations`, or
/// violates the structure contract anywhere.
pub fn parse_structure(text: &str) -> CinebreakResult<BreakdownDocument> {
    let stage = OutputStage::Structure;
    let value = parse_response(text, stage)?;

    if let Some(object) = value.as_object() {
        if let Some(missing) = StructureSchema::REQUIRED
            .iter()
            .find(|key| !object.contains_key(**key))
        {
            error!(key = missing, "Structure response is missing a required key");
            return Err(MalformedOutputError::new(
                stage,
                MalformedOutputKind::MissingKey((*missing).to_string()),
            )
            .into());
        }
    }

    let violations = StructureSchema::validate(&value);
    if !violations.is_empty() {
        error!(count = violations.len(), first = %violations[0], "Structure response violates schema");
        return Err(MalformedOutputError::new(
            stage,
            MalformedOutputKind::SchemaViolations(describe_violations(&violations)),
        )
        .into());
    }

    let mut document: BreakdownDocument = serde_json::from_value(value).map_err(|e| {
        MalformedOutputError::new(stage, MalformedOutputKind::InvalidJson(e.to_string()))
    })?;

    for scene in &mut document.scenes {
        scene.shots.clear();
        scene.scene_image_url = None;
    }
    for character in &mut document.characters {
        character.portrait_url = None;
    }
    Ok(document)
}
