//! Sequencing stages over the canonical document.

use crate::prompts::{character_portrait_prompt, scene_concept_prompt, scene_payload};
use crate::{BreakdownPipeline, RepairOutcome};
use cinebreak_core::{
    BreakdownDocument, Character, CharacterRole, ImageHandle, ImageStyle, Scene, ScriptInput, Shot,
};
use cinebreak_error::{CinebreakResult, InputError, InputErrorKind};
use cinebreak_interface::{ProjectSnapshot, SnapshotStore};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Edits to one registry entry. `None` leaves a field alone; an empty string
/// clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, derive_builder::Builder)]
#[builder(setter(into, strip_option), default)]
pub struct CharacterPatch {
    /// New cast classification
    pub role: Option<CharacterRole>,
    /// New appearance and costume
    pub costume_description: Option<String>,
    /// New colour
    pub color_hex: Option<String>,
    /// New actor
    pub actor_name: Option<String>,
    /// New contract status
    pub contract_status: Option<String>,
    /// New notes
    pub notes: Option<String>,
}

impl CharacterPatch {
    /// Start building a patch.
    pub fn builder() -> CharacterPatchBuilder {
        CharacterPatchBuilder::default()
    }

    /// Apply to the registry entry named exactly `name`; returns whether the
    /// costume text changed.
    ///
    /// # Errors
    ///
    /// `InputError` (`UnknownCharacter`) if no entry has that name.
    pub fn apply_to_document(&self, document: &mut BreakdownDocument, name: &str) -> CinebreakResult<bool> {
        let character = document
            .character_mut(name)
            .ok_or_else(|| InputError::new(InputErrorKind::UnknownCharacter(name.to_string())))?;
        Ok(self.apply(character))
    }

    /// Apply to `character`; returns whether the costume text changed.
    pub fn apply(&self, character: &mut Character) -> bool {
        fn optional(value: &str) -> Option<String> {
            (!value.trim().is_empty()).then(|| value.to_string())
        }

        if let Some(role) = self.role {
            character.role = role;
        }
        if let Some(hex) = &self.color_hex {
            character.color_hex = hex.clone();
        }
        if let Some(actor) = &self.actor_name {
            character.actor_name = optional(actor);
        }
        if let Some(status) = &self.contract_status {
            character.contract_status = optional(status);
        }
        if let Some(notes) = &self.notes {
            character.notes = optional(notes);
        }
        match &self.costume_description {
            Some(costume) if *costume != character.costume_description => {
                character.costume_description = costume.clone();
                character.portrait_url = None;
                true
            }
            _ => false,
        }
    }
}

/// Per-scene result of a character sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneSyncOutcome {
    /// The repair result was merged (or failed open)
    Repaired(RepairOutcome),
    /// The scene's shot list changed while the repair ran; result discarded
    Stale,
}

/// One scene in a [`SyncReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSync {
    /// Scene index in the document
    pub index: usize,
    /// What happened to it
    pub outcome: SceneSyncOutcome,
}

/// Result of [`PipelineCoordinator::sync_characters`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Scenes that had shots when the sync started, in document order
    pub scenes: Vec<SceneSync>,
}

impl SyncReport {
    /// Total shots whose prompt changed.
    pub fn changed_shots(&self) -> usize {
        self.scenes
            .iter()
            .map(|s| match &s.outcome {
                SceneSyncOutcome::Repaired(outcome) => outcome.changed(),
                SceneSyncOutcome::Stale => 0,
            })
            .sum()
    }

    /// Indices of scenes that failed open.
    pub fn failures(&self) -> Vec<usize> {
        self.scenes
            .iter()
            .filter(|s| matches!(&s.outcome, SceneSyncOutcome::Repaired(o) if o.is_failure()))
            .map(|s| s.index)
            .collect()
    }

    /// Indices of scenes whose result was discarded.
    pub fn stale(&self) -> Vec<usize> {
        self.scenes
            .iter()
            .filter(|s| s.outcome == SceneSyncOutcome::Stale)
            .map(|s| s.index)
            .collect()
    }
}

/// Owns the canonical document and runs stages against it.
///
/// Stage calls run without holding the document lock; only merges take the
/// write lock, each touching a single scene or the registry. Overlapping shot
/// generation and repair on the same scene is the caller's responsibility.
pub struct PipelineCoordinator {
    pipeline: BreakdownPipeline,
    document: RwLock<Option<BreakdownDocument>>,
    script: RwLock<Option<ScriptInput>>,
    history: Option<Arc<dyn SnapshotStore>>,
}

impl PipelineCoordinator {
    /// Create a coordinator with no document loaded.
    pub fn new(pipeline: BreakdownPipeline) -> Self {
        Self {
            pipeline,
            document: RwLock::new(None),
            script: RwLock::new(None),
            history: None,
        }
    }

    /// Persist a snapshot after every successful analysis.
    pub fn with_history(mut self, history: Arc<dyn SnapshotStore>) -> Self {
        self.history = Some(history);
        self
    }

    /// The stage runner.
    pub fn pipeline(&self) -> &BreakdownPipeline {
        &self.pipeline
    }

    /// Copy of the current document.
    pub async fn document(&self) -> Option<BreakdownDocument> {
        self.document.read().await.clone()
    }

    /// Replace the current document, e.g. after opening a project file.
    ///
    /// `script` is re-sent as context for shot generation; without it a short
    /// scene description is used instead.
    pub async fn load_document(&self, document: BreakdownDocument, script: Option<ScriptInput>) {
        info!(title = %document.title, scenes = document.scenes.len(), "Document loaded");
        *self.document.write().await = Some(document);
        *self.script.write().await = script;
    }

    /// Load a project file.
    ///
    /// # Errors
    ///
    /// `JsonError` if the text is not a breakdown document.
    pub async fn import_json(&self, json: &str) -> CinebreakResult<()> {
        let document = BreakdownDocument::from_json(json)?;
        self.load_document(document, None).await;
        Ok(())
    }

    /// Serialize the current document as a project file.
    ///
    /// # Errors
    ///
    /// `InputError` (`NoDocument`) if nothing is loaded.
    pub async fn export_json(&self) -> CinebreakResult<String> {
        match self.document.read().await.as_ref() {
            Some(document) => document.to_json(),
            None => Err(InputError::new(InputErrorKind::NoDocument).into()),
        }
    }

    /// Analyze a screenplay and make the result the current document.
    ///
    /// On failure the previous document, if any, stays in place.
    ///
    /// # Errors
    ///
    /// Errors of [`BreakdownPipeline::analyze_structure`], untouched.
    #[instrument(skip_all)]
    pub async fn submit(&self, input: ScriptInput) -> CinebreakResult<BreakdownDocument> {
        let document = self.pipeline.analyze_structure(&input).await?;

        *self.document.write().await = Some(document.clone());
        *self.script.write().await = Some(input);

        if let Some(history) = &self.history {
            if let Err(e) = history.save(ProjectSnapshot::new(document.clone())).await {
                warn!(error = %e, "Failed to save project snapshot");
            }
        }
        Ok(document)
    }

    /// Generate shots for one scene and splice them into the document.
    ///
    /// If the document was replaced while the model ran and the index now
    /// points at another scene, the shots are returned but not stored.
    ///
    /// # Errors
    ///
    /// `InputError` without a document or for an out-of-range index; stage
    /// errors untouched. On error the scene keeps its previous shots.
    #[instrument(skip(self))]
    pub async fn generate_shots_for_scene(&self, index: usize) -> CinebreakResult<Vec<Shot>> {
        let (scene, characters) = {
            let guard = self.document.read().await;
            let document = guard
                .as_ref()
                .ok_or_else(|| InputError::new(InputErrorKind::NoDocument))?;
            let scene = document.scenes.get(index).cloned().ok_or_else(|| {
                InputError::new(InputErrorKind::SceneOutOfRange {
                    index,
                    len: document.scenes.len(),
                })
            })?;
            (scene, document.characters.clone())
        };

        let input = match self.script.read().await.clone() {
            Some(input) => input,
            None => {
                debug!("No screenplay loaded; sending scene description");
                ScriptInput::Text(scene_payload(&scene))
            }
        };

        let shots = self
            .pipeline
            .generate_scene_shots(&scene.scene_number, &input, &scene, &characters)
            .await?;

        let mut guard = self.document.write().await;
        match guard.as_mut().and_then(|document| document.scenes.get_mut(index)) {
            Some(target) if same_scene(target, &scene) => target.shots = shots.clone(),
            _ => warn!(scene = index, "Document changed during shot generation; shots not stored"),
        }
        Ok(shots)
    }

    /// Re-synchronize image prompts of every scene that has shots.
    ///
    /// Scenes are repaired concurrently and merged after all of them settle.
    /// A scene whose shot count changed in the meantime is left alone.
    ///
    /// # Errors
    ///
    /// `InputError` (`NoDocument`) only; repair itself never fails.
    #[instrument(skip(self))]
    pub async fn sync_characters(&self) -> CinebreakResult<SyncReport> {
        let (tasks, characters) = {
            let guard = self.document.read().await;
            let document = guard
                .as_ref()
                .ok_or_else(|| InputError::new(InputErrorKind::NoDocument))?;
            let tasks: Vec<(usize, usize, Scene)> = document
                .scenes
                .iter()
                .enumerate()
                .filter(|(_, scene)| scene.has_shots())
                .map(|(index, scene)| (index, scene.shots.len(), scene.clone()))
                .collect();
            (tasks, document.characters.clone())
        };

        info!(scenes = tasks.len(), "Syncing characters");
        let characters = &characters;
        let reports = join_all(tasks.iter().map(|(_, _, scene)| async move {
            self.pipeline.repair_scene(scene, characters).await
        }))
        .await;

        let mut guard = self.document.write().await;
        let Some(document) = guard.as_mut() else {
            return Err(InputError::new(InputErrorKind::NoDocument).into());
        };

        let mut report = SyncReport::default();
        for ((index, shot_count, _), repair) in tasks.into_iter().zip(reports) {
            let outcome = match document.scenes.get_mut(index) {
                Some(scene) if scene.shots.len() == shot_count => {
                    scene.shots = repair.shots;
                    SceneSyncOutcome::Repaired(repair.outcome)
                }
                _ => {
                    warn!(scene = index, "Shot list changed during sync; discarding repair");
                    SceneSyncOutcome::Stale
                }
            };
            report.scenes.push(SceneSync { index, outcome });
        }

        info!(
            changed = report.changed_shots(),
            failed = report.failures().len(),
            "Character sync complete"
        );
        Ok(report)
    }

    /// Render one shot's storyboard frame and store the handle on the shot.
    ///
    /// If the shot's prompt changed while the image rendered, the handle is
    /// returned but not stored.
    ///
    /// # Errors
    ///
    /// `InputError` for a missing document, scene or shot; image and provider
    /// errors untouched, in which case the shot keeps its previous image.
    #[instrument(skip(self))]
    pub async fn generate_shot_image(
        &self,
        scene_index: usize,
        shot_number: u32,
        style: ImageStyle,
    ) -> CinebreakResult<ImageHandle> {
        let prompt = {
            let guard = self.document.read().await;
            let document = guard
                .as_ref()
                .ok_or_else(|| InputError::new(InputErrorKind::NoDocument))?;
            let scene = document.scenes.get(scene_index).ok_or_else(|| {
                InputError::new(InputErrorKind::SceneOutOfRange {
                    index: scene_index,
                    len: document.scenes.len(),
                })
            })?;
            scene
                .shots
                .iter()
                .find(|s| s.shot_number == shot_number)
                .map(|s| s.visual_prompt.clone())
                .ok_or_else(|| {
                    InputError::new(InputErrorKind::ShotNotFound {
                        scene: scene_index,
                        shot: shot_number,
                    })
                })?
        };

        let handle = self.pipeline.generate_image(&prompt, style).await?;

        let mut guard = self.document.write().await;
        match guard
            .as_mut()
            .and_then(|d| d.scenes.get_mut(scene_index))
            .and_then(|s| s.shot_mut(shot_number))
        {
            Some(shot) if shot.visual_prompt == prompt => {
                shot.image_url = Some(handle.as_str().to_string());
            }
            _ => warn!("Shot prompt changed while rendering; image not stored"),
        }
        Ok(handle)
    }

    /// Render a scene's master concept art into `scene_image_url`.
    ///
    /// # Errors
    ///
    /// `InputError` for a missing document or scene; image and provider errors
    /// untouched, in which case the scene keeps its previous image.
    #[instrument(skip(self))]
    pub async fn generate_scene_image(&self, index: usize, style: ImageStyle) -> CinebreakResult<ImageHandle> {
        let scene = self.scene_at(index).await?;
        let handle = self
            .pipeline
            .generate_image(&scene_concept_prompt(&scene), style)
            .await?;

        let mut guard = self.document.write().await;
        match guard.as_mut().and_then(|d| d.scenes.get_mut(index)) {
            Some(target) if same_scene(target, &scene) => {
                target.scene_image_url = Some(handle.as_str().to_string());
            }
            _ => warn!(scene = index, "Document changed while rendering; image not stored"),
        }
        Ok(handle)
    }

    /// Render a character portrait from the registry entry into `portrait_url`.
    ///
    /// The portrait is not stored if the costume changed while it rendered.
    ///
    /// # Errors
    ///
    /// `InputError` without a document or for an unknown name; image and
    /// provider errors untouched.
    #[instrument(skip(self))]
    pub async fn generate_character_image(&self, name: &str, style: ImageStyle) -> CinebreakResult<ImageHandle> {
        let character = {
            let guard = self.document.read().await;
            let document = guard
                .as_ref()
                .ok_or_else(|| InputError::new(InputErrorKind::NoDocument))?;
            document
                .character(name)
                .cloned()
                .ok_or_else(|| InputError::new(InputErrorKind::UnknownCharacter(name.to_string())))?
        };

        let handle = self
            .pipeline
            .generate_image(&character_portrait_prompt(&character), style)
            .await?;

        let mut guard = self.document.write().await;
        match guard.as_mut().and_then(|d| d.character_mut(name)) {
            Some(current) if current.costume_description == character.costume_description => {
                current.portrait_url = Some(handle.as_str().to_string());
            }
            _ => warn!(name, "Costume changed while rendering; portrait not stored"),
        }
        Ok(handle)
    }

    async fn scene_at(&self, index: usize) -> CinebreakResult<Scene> {
        let guard = self.document.read().await;
        let document = guard
            .as_ref()
            .ok_or_else(|| InputError::new(InputErrorKind::NoDocument))?;
        document.scenes.get(index).cloned().ok_or_else(|| {
            InputError::new(InputErrorKind::SceneOutOfRange {
                index,
                len: document.scenes.len(),
            })
            .into()
        })
    }

    /// Edit a registry entry by exact name.
    ///
    /// Returns whether the costume description changed, in which case the
    /// caller may want to [`sync_characters`](Self::sync_characters).
    ///
    /// # Errors
    ///
    /// `InputError` without a document or for an unknown name.
    pub async fn update_character(&self, name: &str, patch: &CharacterPatch) -> CinebreakResult<bool> {
        let mut guard = self.document.write().await;
        let document = guard
            .as_mut()
            .ok_or_else(|| InputError::new(InputErrorKind::NoDocument))?;
        let costume_changed = patch.apply_to_document(document, name)?;
        debug!(name, costume_changed, "Character updated");
        Ok(costume_changed)
    }
}

/// Whether `current` is still the scene a stage started from.
fn same_scene(current: &Scene, started: &Scene) -> bool {
    current.scene_number == started.scene_number && current.header == started.header
}

impl std::fmt::Debug for PipelineCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineCoordinator")
            .field("pipeline", &self.pipeline)
            .field("history", &self.history.is_some())
            .finish_non_exhaustive()
    }
}
