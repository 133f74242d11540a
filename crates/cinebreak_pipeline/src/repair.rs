//! Stage 3: keep shot prompts in sync with character descriptions.
//!
//! Repair is fail-open. Whatever goes wrong, the caller gets a usable shot
//! list back, and the [`RepairOutcome`] says what happened.

use crate::BreakdownPipeline;
use crate::extraction::parse_response;
use crate::prompts::{appearance_block, repair_instruction, shots_context};
use crate::schema::{PromptUpdateSchema, describe_violations};
use cinebreak_core::{Character, Scene, ScriptInput, Shot};
use cinebreak_error::OutputStage;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// What a repair pass did to a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// The scene has no shots; the model was not called
    NoShots,
    /// These shot numbers got new prompts and lost their images
    Updated(Vec<u32>),
    /// The model echoed every prompt; nothing changed
    Unchanged,
    /// The response could not be used; shots are untouched
    SoftFailure(String),
}

impl RepairOutcome {
    /// Number of shots whose prompt changed.
    pub fn changed(&self) -> usize {
        match self {
            RepairOutcome::Updated(numbers) => numbers.len(),
            _ => 0,
        }
    }

    /// Whether the pass failed open.
    pub fn is_failure(&self) -> bool {
        matches!(self, RepairOutcome::SoftFailure(_))
    }
}

/// Shots after a repair pass, with the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairReport {
    /// Resulting shot list, same order and length as the input
    pub shots: Vec<Shot>,
    /// What happened
    pub outcome: RepairOutcome,
}

impl BreakdownPipeline {
    /// Rewrite the scene's image prompts to match the current registry.
    ///
    /// Always returns a shot list: on any failure the original shots come back
    /// unchanged.
    pub async fn update_shots_with_new_characters(
        &self,
        scene: &Scene,
        characters: &[Character],
    ) -> Vec<Shot> {
        self.repair_scene(scene, characters).await.shots
    }

    /// Repair one scene and report the outcome.
    #[instrument(skip_all, fields(scene = %scene.scene_number, shots = scene.shots.len()))]
    pub async fn repair_scene(&self, scene: &Scene, characters: &[Character]) -> RepairReport {
        if scene.shots.is_empty() {
            return RepairReport {
                shots: Vec::new(),
                outcome: RepairOutcome::NoShots,
            };
        }

        let cast = self.matcher.characters_in(characters, scene);
        let request = match self.request(
            repair_instruction(&appearance_block(&cast)),
            ScriptInput::Text(shots_context(&scene.shots)),
            PromptUpdateSchema::schema(),
            *self.settings.repair_temperature(),
        ) {
            Ok(request) => request,
            Err(e) => return soft_failure(scene, e.to_string()),
        };

        debug!(cast = cast.len(), "Requesting prompt updates");
        let text = match self.model.generate(&request).await {
            Ok(text) => text,
            Err(e) => return soft_failure(scene, e.to_string()),
        };

        let report = apply_prompt_updates(&scene.shots, &text);
        match &report.outcome {
            RepairOutcome::SoftFailure(reason) => {
                warn!(reason = %reason, "Prompt update unusable; keeping shots")
            }
            outcome => info!(changed = outcome.changed(), "Scene repaired"),
        }
        report
    }
}

fn soft_failure(scene: &Scene, reason: String) -> RepairReport {
    warn!(reason = %reason, "Repair call failed; keeping shots");
    RepairReport {
        shots: scene.shots.clone(),
        outcome: RepairOutcome::SoftFailure(reason),
    }
}

/// Merge a prompt update response into `shots`.
///
/// Updates are matched by `shot_number`. A shot whose prompt actually changes
/// loses its image; a byte-identical prompt leaves the shot untouched; unknown
/// shot numbers are ignored. Empty, unparseable or off-contract responses leave
/// every shot as it was.
pub fn apply_prompt_updates(shots: &[Shot], text: &str) -> RepairReport {
    let unchanged = |reason: String| RepairReport {
        shots: shots.to_vec(),
        outcome: RepairOutcome::SoftFailure(reason),
    };

    if text.trim().is_empty() {
        return unchanged("empty response".to_string());
    }

    let value = match parse_response(text, OutputStage::PromptUpdate) {
        Ok(value) => value,
        Err(e) => return unchanged(e.to_string()),
    };

    let violations = PromptUpdateSchema::validate(&value);
    if !violations.is_empty() {
        return unchanged(describe_violations(&violations));
    }

    let updates: HashMap<u64, &str> = value
        .get("updated_prompts")
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    Some((
                        entry.get("shot_number")?.as_u64()?,
                        entry.get("visual_prompt")?.as_str()?,
                    ))
                })
                .collect()
        })
        .unwrap_or_default();

    let mut changed = Vec::new();
    let repaired = shots
        .iter()
        .map(|shot| {
            let mut shot = shot.clone();
            if let Some(prompt) = updates.get(&u64::from(shot.shot_number)) {
                if shot.rewrite_prompt(*prompt) {
                    changed.push(shot.shot_number);
                }
            }
            shot
        })
        .collect();

    let outcome = if changed.is_empty() {
        RepairOutcome::Unchanged
    } else {
        RepairOutcome::Updated(changed)
    };
    RepairReport {
        shots: repaired,
        outcome,
    }
}
