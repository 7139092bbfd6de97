//! CLI argument parsing for unidup
//!
//! Uses clap derive. Global flags: --store, --format, --quiet, --verbose,
//! --log-level, --log-json.

pub mod output;
pub mod parse;

use clap::Parser;
use std::path::PathBuf;

use crate::commands::Commands;
pub use output::OutputFormat;

/// Unidup - duplicate asset consolidation CLI
#[derive(Parser, Debug)]
#[command(name = "unidup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Store root path
    #[arg(long, global = true, env = "UNIDUP_STORE", default_value = ".")]
    pub store: PathBuf,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Log per-member detail instead of a progress bar
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Explicit log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}
