//! Command-line interface module.

mod commands;
mod handlers;
mod project;

pub use commands::Cli;
pub use handlers::run_command;
