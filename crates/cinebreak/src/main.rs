//! cinebreak CLI binary.
//!
//! - Analyze a screenplay into a project file
//! - Generate shot lists and storyboard frames per scene
//! - Edit characters and keep image prompts in sync
//! - Browse the project history

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, run_command};

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = cinebreak::CinebreakConfig::load(cli.config.as_deref())?;
    cinebreak::init_logging(&config.logging, cli.verbose)?;

    run_command(cli.command, &config).await?;
    Ok(())
}
