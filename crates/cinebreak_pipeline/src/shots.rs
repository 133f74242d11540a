//! Stage 2: shot list for one scene.

use crate::BreakdownPipeline;
use crate::extraction::parse_response;
use crate::prompts::{cast_block, shots_instruction};
use crate::schema::{ShotsSchema, describe_violations};
use cinebreak_core::{Character, Scene, SceneNumber, ScriptInput, Shot};
use cinebreak_error::{CinebreakResult, MalformedOutputError, MalformedOutputKind, OutputStage};
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

/// A shot as the model reports it; numbering and images are ours.
#[derive(Debug, Deserialize)]
struct GeneratedShot {
    size: String,
    angle: String,
    movement: String,
    subject: String,
    description: String,
    #[serde(default)]
    background_details: String,
    visual_prompt: String,
}

impl BreakdownPipeline {
    /// Generate the shot list for one scene.
    ///
    /// Only registry characters present in the scene are described to the
    /// model, each with actor and costume, and the model is told to carry those
    /// descriptions into every `visual_prompt`. The full screenplay is re-sent
    /// as context.
    ///
    /// # Errors
    ///
    /// `ProviderError` from the transport; `MalformedOutputError` for invalid
    /// JSON or malformed shot entries. A response without `shots` yields an
    /// empty list.
    #[instrument(skip_all, fields(scene = %scene_number, header = %scene.header))]
    pub async fn generate_scene_shots(
        &self,
        scene_number: &SceneNumber,
        full_input: &ScriptInput,
        scene: &Scene,
        characters: &[Character],
    ) -> CinebreakResult<Vec<Shot>> {
        let cast = self.matcher.characters_in(characters, scene);
        debug!(cast = cast.len(), "Filtered registry for scene");

        let instruction = shots_instruction(
            scene_number,
            scene,
            &cast_block(&cast, self.settings.actor_placeholder()),
            self.settings.output_language(),
        );
        let request = self.request(
            instruction,
            full_input.clone(),
            ShotsSchema::schema(),
            *self.settings.shots_temperature(),
        )?;

        let text = self.model.generate(&request).await?;
        let shots = parse_shots(&text)?;
        info!(shots = shots.len(), "Shot list generated");
        Ok(shots)
    }
}

/// Parse and validate a shot generation response.
///
/// Shots are renumbered 1..N in array order and never carry an image.
///
/// # Errors
///
/// Returns `MalformedOutputError` (stage `Shots`) for invalid JSON, a
/// non-object response or any malformed shot entry.
pub fn parse_shots(text: &str) -> CinebreakResult<Vec<Shot>> {
    let stage = OutputStage::Shots;
    let value = parse_response(text, stage)?;

    if value
        .as_object()
        .is_some_and(|o| o.get("shots").is_none_or(|shots| shots.is_null()))
    {
        warn!("Shot response has no 'shots' list; treating as empty");
        return Ok(Vec::new());
    }

    let violations = ShotsSchema::validate(&value);
    if !violations.is_empty() {
        error!(count = violations.len(), first = %violations[0], "Shot response violates schema");
        return Err(MalformedOutputError::new(
            stage,
            MalformedOutputKind::SchemaViolations(describe_violations(&violations)),
        )
        .into());
    }

    let entries = value
        .get("shots")
        .cloned()
        .unwrap_or_else(|| serde_json::Value::Array(Vec::new()));
    let generated: Vec<GeneratedShot> = serde_json::from_value(entries).map_err(|e| {
        MalformedOutputError::new(stage, MalformedOutputKind::InvalidJson(e.to_string()))
    })?;

    Ok(generated
        .into_iter()
        .zip(1u32..)
        .map(|(g, shot_number)| Shot {
            shot_number,
            size: g.size,
            angle: g.angle,
            movement: g.movement,
            subject: g.subject,
            description: g.description,
            background_details: g.background_details,
            visual_prompt: g.visual_prompt,
            image_url: None,
        })
        .collect())
}
