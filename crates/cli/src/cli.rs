//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Hunter - batch processing of records matching a predicate
#[derive(Parser, Debug)]
#[command(
    name = "hunter",
    author,
    version,
    about = "Run record hunts over JSON fixture tables",
    long_about = "Loads a hunt configuration (target record type, predicate, paging, logging), \n\
                  pages through the matching records of a JSON fixture file and reports \n\
                  how many records succeeded, failed or were skipped."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "HUNTER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "HUNTER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a hunt
    Run(RunArgs),

    /// Validate a hunt configuration without running it
    Validate(ValidateArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to the hunt configuration (TOML or JSON)
    #[arg(short, long, default_value = "hunt.toml", env = "HUNTER_CONFIG")]
    pub config: PathBuf,

    /// Path to the JSON fixture file holding the record tables
    #[arg(short, long, env = "HUNTER_DATA")]
    pub data: PathBuf,

    /// Override the page size from the configuration
    #[arg(long, env = "HUNTER_CHUNK")]
    pub chunk: Option<usize>,

    /// Stop the hunt after this many records went through the main stage
    #[arg(long, env = "HUNTER_LIMIT", value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Print the detailed summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "HUNTER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the hunt configuration to validate
    #[arg(short, long, default_value = "hunt.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
