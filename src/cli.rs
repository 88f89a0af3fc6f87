// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand, ValueEnum};
use strato::output::OutputMode;

#[derive(Parser)]
#[command(name = "strato")]
#[command(about = "Deploy and release services on managed container-serving platforms")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Normal)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new strato.yml configuration file
    Init {
        /// Service name for the template
        #[arg(long)]
        service: Option<String>,

        /// Artifact reference for the template
        #[arg(long)]
        artifact: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Deploy the configured artifact, creating a new revision if needed
    Deploy {
        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,

        /// Route 100% of traffic to the deployed revision afterwards
        #[arg(long)]
        promote: bool,
    },

    /// Apply a traffic split across ready revisions
    Release {
        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,

        /// Traffic target as REVISION=PERCENT; repeat for a split.
        /// Defaults to the `traffic` section of the config.
        #[arg(long = "to", value_name = "REVISION=PERCENT")]
        targets: Vec<String>,
    },

    /// Show the deployed revision and current traffic split
    Status {
        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Normal,
    Quiet,
    Json,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Normal => OutputMode::Normal,
            OutputFormat::Quiet => OutputMode::Quiet,
            OutputFormat::Json => OutputMode::Json,
        }
    }
}
