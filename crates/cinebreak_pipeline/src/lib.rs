//! The cinebreak generation pipeline.
//!
//! Three schema-constrained model invocations turn a screenplay into a
//! production breakdown:
//!
//! 1. **Structure analysis** ([`BreakdownPipeline::analyze_structure`]): scenes,
//!    character registry, props and locations
//! 2. **Shot generation** ([`BreakdownPipeline::generate_scene_shots`]): a shot
//!    list for one scene, with the scene's characters described in every
//!    image prompt
//! 3. **Consistency repair** ([`BreakdownPipeline::update_shots_with_new_characters`]):
//!    rewrites image prompts after costume edits, clearing stale images
//!
//! [`PipelineCoordinator`] owns the document and sequences these on demand.
//! Model output is always validated against the [`StructureSchema`],
//! [`ShotsSchema`] and [`PromptUpdateSchema`] contracts.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod coordinator;
mod extraction;
mod image;
mod matcher;
mod pipeline;
pub mod prompts;
mod repair;
mod schema;
mod settings;
mod shots;
mod structure;

pub use coordinator::{
    CharacterPatch, CharacterPatchBuilder, PipelineCoordinator, SceneSync, SceneSyncOutcome,
    SyncReport,
};
pub use extraction::{extract_json, parse_response};
pub use image::styled_prompt;
pub use matcher::{CharacterMatcher, MatchStrategy};
pub use pipeline::BreakdownPipeline;
pub use repair::{RepairOutcome, RepairReport, apply_prompt_updates};
pub use schema::{
    PromptUpdateSchema, ROLE_LABELS, SchemaNode, SchemaViolation, ShotsSchema, StructureSchema,
    describe_violations,
};
pub use settings::{PipelineSettings, PipelineSettingsBuilder};
pub use shots::parse_shots;
pub use structure::parse_structure;
