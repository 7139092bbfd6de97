//! Command handlers and dispatch

use clap::{Args, Subcommand};

use crate::cli::parse::parse_field_name;
use crate::cli::Cli;
use unidup_core::error::Result;

mod cleanup_versions;
mod groups;
mod init;
pub mod run;
mod sink;

/// Top-level unidup commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new unidup store
    Init,

    /// List duplicate asset groups without changing anything
    Groups(GroupsArgs),

    /// Remove all duplicates of an asset and repoint every reference
    /// to the unified asset
    Run(RunArgs),

    /// Point duplicate version rows at one shared binary and delete the
    /// redundant snapshots
    CleanupVersions(CleanupVersionsArgs),
}

/// Arguments for the groups command.
#[derive(Args, Debug)]
pub struct GroupsArgs {
    /// Maximum number of groups to list
    #[arg(long, short, default_value_t = 10)]
    pub limit: usize,
}

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Deduplicate this asset's group instead of the largest group.
    /// (Note: the given asset may not be selected as the base asset)
    #[arg(long, short = 'a')]
    pub asset_id: Option<i64>,

    /// A numeric limit on how many duplicates should be deleted
    #[arg(long, short)]
    pub limit: Option<usize>,

    /// Comma-separated gallery fields to persist on save
    #[arg(long, action = clap::ArgAction::Append, value_delimiter = ',', value_parser = parse_field_name)]
    pub save_fields: Option<Vec<String>>,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

/// Arguments for the cleanup-versions command.
#[derive(Args, Debug)]
pub struct CleanupVersionsArgs {
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

/// Execute the parsed command
pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Init => init::execute(cli),
        Commands::Groups(args) => groups::execute(cli, args),
        Commands::Run(args) => run::execute(cli, args),
        Commands::CleanupVersions(args) => cleanup_versions::execute(cli, args),
    }
}
