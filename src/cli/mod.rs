//! CLI interface and argument parsing

pub mod commands;

use clap::{Parser, Subcommand};

/// eICR Anonymizer - replaces PHI in eICR documents with realistic fake values
#[derive(Parser, Debug)]
#[command(name = "eicr-anonymizer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file; defaults apply when it does not exist
    #[arg(
        short,
        long,
        default_value = "eicr-anonymizer.toml",
        env = "EICR_ANON_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize a document or a directory of documents
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Validate the configuration and sensitivity layers
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
