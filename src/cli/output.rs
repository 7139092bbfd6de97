//! Output format selection

use clap::ValueEnum;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    Human,
    /// JSON events on stderr, JSON result on stdout
    Json,
}
