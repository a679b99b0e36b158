//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Daily integration probe for the catalog and product job pipeline.
#[derive(Parser, Debug)]
#[command(name = "probe", version, about, long_about = None)]
pub struct Cli {
    /// Path to the probe.toml configuration file.
    #[arg(
        short,
        long,
        global = true,
        env = "PROBE_CONFIG",
        default_value = "probe.toml"
    )]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs and results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Advance today's tracked job one step: trigger, wait or finish.
    Setup,

    /// Check today's tracked jobs and download their assets.
    Scenario,

    /// Upload a fresh seed and wait for both jobs to complete.
    Watch,
}
