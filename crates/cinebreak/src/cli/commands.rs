//! CLI command definitions.

use cinebreak::{CharacterRole, ImageStyle};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

/// cinebreak - screenplay breakdown, shot lists and storyboards
#[derive(Parser, Debug)]
#[command(name = "cinebreak")]
#[command(about = "Screenplay breakdown, shot lists and storyboards", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra configuration file, layered over the defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a screenplay (text or PDF) into a project file
    Analyze {
        /// Screenplay file
        script: PathBuf,

        /// Project file to write; printed to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the shot list of one scene
    Shots {
        /// Project file, updated in place
        project: PathBuf,

        /// Scene index, starting at 0
        #[arg(long)]
        scene: usize,

        /// Screenplay to send as context; a scene summary is sent otherwise
        #[arg(long)]
        script: Option<PathBuf>,
    },

    /// Rewrite image prompts to match the current character descriptions
    Sync {
        /// Project file, updated in place
        project: PathBuf,
    },

    /// Render the storyboard frame of one shot, or the scene's concept art
    Image {
        /// Project file, updated in place
        project: PathBuf,

        /// Scene index, starting at 0
        #[arg(long)]
        scene: usize,

        /// Shot number within the scene; the scene's concept art when omitted
        #[arg(long)]
        shot: Option<u32>,

        /// sketch, color or realistic; the configured style when omitted
        #[arg(long)]
        style: Option<ImageStyle>,
    },

    /// Render a character portrait from its costume description
    Portrait {
        /// Project file, updated in place
        project: PathBuf,

        /// Exact character name
        name: String,

        /// sketch, color or realistic; the configured style when omitted
        #[arg(long)]
        style: Option<ImageStyle>,
    },

    /// Edit a character of the registry
    Character(CharacterArgs),

    /// Saved project snapshots
    #[command(subcommand)]
    History(HistoryCommands),
}

/// Arguments of `character`.
#[derive(clap::Args, Debug)]
pub struct CharacterArgs {
    /// Project file, updated in place
    pub project: PathBuf,

    /// Exact character name
    pub name: String,

    /// New appearance and costume
    #[arg(long)]
    pub costume: Option<String>,

    /// New role: protagonist, supporting or background
    #[arg(long)]
    pub role: Option<CharacterRole>,

    /// New colour, e.g. "#B22222"
    #[arg(long)]
    pub color: Option<String>,

    /// Cast actor; empty to clear
    #[arg(long)]
    pub actor: Option<String>,

    /// Contract status; empty to clear
    #[arg(long)]
    pub contract: Option<String>,

    /// Notes; empty to clear
    #[arg(long)]
    pub notes: Option<String>,

    /// Sync image prompts afterwards if the costume changed
    #[arg(long)]
    pub sync: bool,
}

/// History subcommands
#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List saved snapshots, newest first
    List,

    /// Print a snapshot's project file
    Show {
        /// Snapshot id
        id: Uuid,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a snapshot
    Delete {
        /// Snapshot id
        id: Uuid,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_without_shot_targets_the_scene() {
        let cli = Cli::try_parse_from(["cinebreak", "image", "p.json", "--scene", "2"]).unwrap();
        match cli.command {
            Commands::Image { scene, shot, style, .. } => {
                assert_eq!(scene, 2);
                assert_eq!(shot, None);
                assert_eq!(style, None);
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from([
            "cinebreak", "image", "p.json", "--scene", "0", "--shot", "3", "--style", "realistic",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Image { shot: Some(3), style: Some(ImageStyle::Realistic), .. }
        ));
    }

    #[test]
    fn portrait_takes_a_character_name() {
        let cli = Cli::try_parse_from(["cinebreak", "portrait", "p.json", "PADRE JOÃO"]).unwrap();
        match cli.command {
            Commands::Portrait { name, style, .. } => {
                assert_eq!(name, "PADRE JOÃO");
                assert_eq!(style, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
