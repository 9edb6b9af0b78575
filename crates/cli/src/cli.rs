//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Ratewatch - Currency exchange-rate monitoring pipeline
#[derive(Parser, Debug)]
#[command(
    name = "ratewatch",
    author,
    version,
    about = "Currency exchange-rate monitoring pipeline",
    long_about = "A fetch-and-fan-out pipeline for currency exchange rates.\n\n\
                  Polls a rate API on a fixed cadence, annotates every attempt \n\
                  with its outcome, and dispatches the resulting descriptors to \n\
                  configured processors."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "RATEWATCH_VERBOSE")]
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
        env = "RATEWATCH_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the monitoring pipeline
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "config.toml", env = "RATEWATCH_CONFIG")]
    pub config: PathBuf,

    /// Override currency code from configuration
    #[arg(long, env = "RATEWATCH_CURRENCY")]
    pub currency: Option<String>,

    /// Override number of historical rates from configuration
    #[arg(long, env = "RATEWATCH_HISTORY")]
    pub history: Option<u32>,

    /// Override fetch attempts per tick from configuration
    #[arg(long, env = "RATEWATCH_ATTEMPTS_PER_TICK")]
    pub attempts_per_tick: Option<u32>,

    /// Override tick interval in milliseconds from configuration
    #[arg(long, env = "RATEWATCH_TICK_INTERVAL_MS")]
    pub tick_interval_ms: Option<u64>,

    /// Override descriptor channel capacity from configuration
    #[arg(long, env = "RATEWATCH_CHANNEL_CAPACITY")]
    pub channel_capacity: Option<usize>,

    /// Maximum number of descriptors to dispatch (0 = unlimited)
    #[arg(long, default_value = "0", env = "RATEWATCH_MAX_DESCRIPTORS")]
    pub max_descriptors: u64,

    /// Pipeline timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "RATEWATCH_TIMEOUT")]
    pub timeout: u64,

    /// Validate configuration and exit without running pipeline
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "9000", env = "RATEWATCH_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show processor parameters
    #[arg(long)]
    pub processors: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
