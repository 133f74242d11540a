//! Command handlers.

use super::commands::{CharacterArgs, Commands, HistoryCommands};
use super::project::{read_project, write_project};
use cinebreak::{
    CharacterPatch, CinebreakConfig, CinebreakResult, ConfigError, ImageHandle, ImageStyle,
    InputError, InputErrorKind, SceneSyncOutcome, ScriptInput, SnapshotStore, StorageError,
    StorageErrorKind, SyncReport, setup,
};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use uuid::Uuid;

/// Run one command against the configuration.
pub async fn run_command(command: Commands, config: &CinebreakConfig) -> CinebreakResult<()> {
    match command {
        Commands::Analyze { script, output } => analyze(&script, output.as_deref(), config).await,
        Commands::Shots {
            project,
            scene,
            script,
        } => shots(&project, scene, script, config).await,
        Commands::Sync { project } => sync(&project, config).await,
        Commands::Image {
            project,
            scene,
            shot,
            style,
        } => {
            let target = match shot {
                Some(shot) => ImageTarget::Shot { scene, shot },
                None => ImageTarget::Scene(scene),
            };
            image(&project, target, style.unwrap_or(config.image.style), config).await
        }
        Commands::Portrait {
            project,
            name,
            style,
        } => {
            let target = ImageTarget::Character(name);
            image(&project, target, style.unwrap_or(config.image.style), config).await
        }
        Commands::Character(args) => character(args, config).await,
        Commands::History(command) => history(command, config).await,
    }
}

#[instrument(skip(config))]
async fn analyze(script: &Path, output: Option<&Path>, config: &CinebreakConfig) -> CinebreakResult<()> {
    let input = ScriptInput::from_path(script)?;
    let coordinator = setup::coordinator(config)?;

    let document = coordinator.submit(input).await?;
    info!(
        title = %document.title,
        scenes = document.scenes.len(),
        characters = document.characters.len(),
        "Screenplay analyzed"
    );
    write_project(output, &document).await
}

#[instrument(skip(config))]
async fn shots(
    project: &Path,
    scene: usize,
    script: Option<PathBuf>,
    config: &CinebreakConfig,
) -> CinebreakResult<()> {
    let document = read_project(project).await?;
    let script = script.map(ScriptInput::from_path).transpose()?;
    let coordinator = setup::coordinator(config)?;
    coordinator.load_document(document, script).await;

    let shots = coordinator.generate_shots_for_scene(scene).await?;
    for shot in &shots {
        println!(
            "{:>3}. [{} | {} | {}] {}",
            shot.shot_number, shot.size, shot.angle, shot.movement, shot.description
        );
    }

    save_current(&coordinator, project).await
}

#[instrument(skip(config))]
async fn sync(project: &Path, config: &CinebreakConfig) -> CinebreakResult<()> {
    let document = read_project(project).await?;
    let coordinator = setup::coordinator(config)?;
    coordinator.load_document(document, None).await;

    let report = coordinator.sync_characters().await?;
    print_sync_report(&report);
    save_current(&coordinator, project).await
}

/// What an `image` or `portrait` command renders.
#[derive(Debug)]
enum ImageTarget {
    Shot { scene: usize, shot: u32 },
    Scene(usize),
    Character(String),
}

#[instrument(skip(config))]
async fn image(
    project: &Path,
    target: ImageTarget,
    style: ImageStyle,
    config: &CinebreakConfig,
) -> CinebreakResult<()> {
    let document = read_project(project).await?;
    let coordinator = setup::coordinator(config)?;
    coordinator.load_document(document, None).await;

    let handle = match &target {
        ImageTarget::Shot { scene, shot } => {
            coordinator.generate_shot_image(*scene, *shot, style).await?
        }
        ImageTarget::Scene(scene) => coordinator.generate_scene_image(*scene, style).await?,
        ImageTarget::Character(name) => coordinator.generate_character_image(name, style).await?,
    };
    match &handle {
        ImageHandle::Url(url) => println!("{}", url),
        ImageHandle::DataUri(uri) => println!("inline image ({} bytes encoded)", uri.len()),
    }

    if let Some(archive) = setup::image_archive(&config.image)? {
        if let Some(archived) = archive.store(&handle).await? {
            println!("archived: {}", archived.path.display());
        }
    }

    save_current(&coordinator, project).await
}

#[instrument(skip(args, config), fields(name = %args.name))]
async fn character(args: CharacterArgs, config: &CinebreakConfig) -> CinebreakResult<()> {
    let mut document = read_project(&args.project).await?;
    let patch = CharacterPatch {
        role: args.role,
        costume_description: args.costume,
        color_hex: args.color,
        actor_name: args.actor,
        contract_status: args.contract,
        notes: args.notes,
    };

    let costume_changed = patch.apply_to_document(&mut document, &args.name)?;
    info!(costume_changed, "Character updated");

    if costume_changed && args.sync {
        let coordinator = setup::coordinator(config)?;
        coordinator.load_document(document, None).await;
        let report = coordinator.sync_characters().await?;
        print_sync_report(&report);
        return save_current(&coordinator, &args.project).await;
    }
    if costume_changed {
        println!("Costume changed; run `cinebreak sync` to update image prompts");
    }
    write_project(Some(&args.project), &document).await
}

async fn history(command: HistoryCommands, config: &CinebreakConfig) -> CinebreakResult<()> {
    let Some(store) = setup::snapshot_store(&config.history)? else {
        return Err(ConfigError::new("Project history is disabled").into());
    };

    match command {
        HistoryCommands::List => {
            for snapshot in store.load_all().await? {
                println!(
                    "{}  {}  {} ({} scenes)",
                    snapshot.id,
                    snapshot.saved_at.format("%Y-%m-%d %H:%M"),
                    snapshot.title,
                    snapshot.document.scenes.len()
                );
            }
        }
        HistoryCommands::Show { id, output } => {
            let snapshot = store.get(id).await?.ok_or_else(|| not_found(id))?;
            write_project(output.as_deref(), &snapshot.document).await?;
        }
        HistoryCommands::Delete { id } => {
            if !store.delete(id).await? {
                return Err(not_found(id).into());
            }
            info!(%id, "Snapshot deleted");
        }
    }
    Ok(())
}

fn not_found(id: Uuid) -> StorageError {
    StorageError::new(StorageErrorKind::NotFound(format!("snapshot {}", id)))
}

async fn save_current(
    coordinator: &cinebreak::PipelineCoordinator,
    project: &Path,
) -> CinebreakResult<()> {
    match coordinator.document().await {
        Some(document) => write_project(Some(project), &document).await,
        None => Err(InputError::new(InputErrorKind::NoDocument).into()),
    }
}

fn print_sync_report(report: &SyncReport) {
    for scene in &report.scenes {
        match &scene.outcome {
            SceneSyncOutcome::Repaired(outcome) if outcome.is_failure() => {
                println!("scene {}: kept as is ({:?})", scene.index, outcome)
            }
            SceneSyncOutcome::Repaired(outcome) => {
                println!("scene {}: {} prompt(s) updated", scene.index, outcome.changed())
            }
            SceneSyncOutcome::Stale => println!("scene {}: changed during sync, skipped", scene.index),
        }
    }
    println!(
        "{} prompt(s) updated, {} scene(s) failed",
        report.changed_shots(),
        report.failures().len()
    );
}
