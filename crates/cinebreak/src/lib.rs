//! cinebreak: screenplay breakdown with generative models.
//!
//! A screenplay goes in; a production breakdown comes out: scenes, a character
//! registry with costume descriptions, props, locations, a shot list per scene
//! and storyboard frames. When a costume changes, every affected image prompt
//! is rewritten and its stale frame dropped.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cinebreak::{CinebreakConfig, ScriptInput, setup};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CinebreakConfig::load(None)?;
//!     let coordinator = setup::coordinator(&config)?;
//!
//!     let document = coordinator.submit(ScriptInput::from_path("roteiro.pdf")?).await?;
//!     println!("{} scenes", document.scenes.len());
//!
//!     coordinator.generate_shots_for_scene(0).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `cinebreak_error` - Error types
//! - `cinebreak_core` - Breakdown document and request types
//! - `cinebreak_interface` - Transport and history traits
//! - `cinebreak_models` - Gemini, proxy, chat-completions and Pollinations transports
//! - `cinebreak_pipeline` - Schemas, stages and the coordinator
//! - `cinebreak_storage` - Project history and image archive
//!
//! This crate re-exports all of them and adds configuration and logging.

pub use cinebreak_core::*;
pub use cinebreak_error::*;
pub use cinebreak_interface::*;
pub use cinebreak_models::{
    GeminiImageTransport, GeminiTransport, OpenAiCompatTransport, PollinationsImageTransport,
    PollinationsSettings, ProxiedImageTransport, ProxiedTransport, ThrottleSettings, Throttled,
};
pub use cinebreak_pipeline::{
    BreakdownPipeline, CharacterMatcher, CharacterPatch, CharacterPatchBuilder, MatchStrategy,
    PipelineCoordinator, PipelineSettings, RepairOutcome, RepairReport, SceneSync,
    SceneSyncOutcome, SyncReport,
};
pub use cinebreak_storage::{ArchivedImage, FileSystemSnapshotStore, ImageArchive};

mod config;
pub mod setup;
mod telemetry;

pub use config::{
    BUNDLED_CONFIG, CinebreakConfig, ENV_PREFIX, HistoryConfig, ImageConfig, ImageProvider,
    LoggingConfig, TextProvider, TransportConfig,
};
pub use telemetry::init_logging;
