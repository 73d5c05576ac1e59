//! Suivi CLI application
//!
//! Command-line front end for tracking workshop quality-control records.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use suivi_core::{params::ListRecords, TrackerBuilder};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let tracker = TrackerBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize tracker")?;

    info!("Suivi started with {}", tracker.database_path().display());

    let cli = Cli::new(tracker, TerminalRenderer::new(!no_color));
    match command {
        Some(User { command }) => cli.handle_user_command(command).await,
        Some(Workshop { command }) => cli.handle_workshop_command(command).await,
        Some(Definition { command }) => cli.handle_definition_command(command).await,
        Some(Record { command }) => cli.handle_record_command(command).await,
        Some(Act(args)) => cli.handle_act(args).await,
        None => cli.list_records(&ListRecords::default()).await,
    }
}
