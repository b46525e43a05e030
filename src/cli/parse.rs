//! CLI parse: clap types for calls-telemetry. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Calls telemetry - toggle analytics reporting and ingest client events
#[derive(Parser)]
#[command(name = "calls-telemetry")]
#[command(about = "Runtime-toggled analytics reporting and client event ingestion")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over global config and defaults)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply configuration and show whether reporting is enabled
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List recognized client events and client types
    Events,
    /// Inspect the effective configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Replay newline-delimited track-event payloads through the handler
    Track {
        /// Authenticated user the payloads are submitted as
        #[arg(long)]
        user_id: String,
        /// Input file (default: stdin)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Watch the configuration file and toggle reporting on change
    Watch {
        /// Quiet period after a change before reloading, in milliseconds
        #[arg(long, default_value = "250")]
        debounce_ms: u64,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML (write key masked)
    Show,
    /// Validate the effective configuration
    Validate,
}
