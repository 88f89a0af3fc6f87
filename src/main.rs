// ABOUTME: Entry point for the strato CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use strato::config;
use strato::error::Result;
use strato::output::Output;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let output = Output::new(cli.output.into());

    if let Err(e) = run(cli, output).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    match cli.command {
        Commands::Init {
            service,
            artifact,
            force,
        } => {
            let cwd = std::env::current_dir()?;
            config::init_config(&cwd, service.as_deref(), artifact.as_deref(), force)
        }
        Commands::Deploy {
            destination,
            promote,
        } => {
            let config = commands::load_config(destination.as_deref())?;
            commands::deploy(config, output, promote).await
        }
        Commands::Release {
            destination,
            targets,
        } => {
            let config = commands::load_config(destination.as_deref())?;
            commands::release(config, output, targets).await
        }
        Commands::Status { destination } => {
            let config = commands::load_config(destination.as_deref())?;
            commands::status(config, output).await
        }
    }
}
