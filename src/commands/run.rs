//! `unidup run` command - the reconciliation run
//!
//! Gates the destructive engine behind an explicit confirmation, then
//! renders the progress stream and the final summary.

use dialoguer::Confirm;

use crate::cli::{Cli, OutputFormat};
use crate::commands::sink::{ConsoleSink, JsonSink};
use crate::commands::RunArgs;
use unidup_core::dedup::{self, RunRequest, RunSummary};
use unidup_core::error::{Result, UnidupError};
use unidup_core::store::Store;

/// Execute the run command
pub fn execute(cli: &Cli, args: &RunArgs) -> Result<()> {
    let store = Store::open(&cli.store)?;

    if !args.yes && !confirm()? {
        println!("Command cancelled");
        return Ok(());
    }

    let request = RunRequest {
        target_asset_id: args.asset_id,
        removal_limit: args
            .limit
            .or(store.config().default_removal_limit)
            .filter(|&l| l > 0),
        save_fields: args
            .save_fields
            .clone()
            .or_else(|| store.config().default_save_fields.clone()),
        confirmed: true,
    };

    let summary = match cli.format {
        OutputFormat::Human => {
            let mut sink = ConsoleSink::new(cli.verbose, cli.quiet);
            dedup::run(&store, &request, &mut sink)?
        }
        OutputFormat::Json => {
            let mut sink = JsonSink;
            dedup::run(&store, &request, &mut sink)?
        }
    };

    print_summary(cli, &summary)
}

fn confirm() -> Result<bool> {
    Confirm::new()
        .with_prompt("This command cannot be undone. Are you sure you want to continue?")
        .default(false)
        .interact()
        .map_err(|e| UnidupError::UsageError(format!("failed to read confirmation: {}", e)))
}

fn print_summary(cli: &Cli, summary: &RunSummary) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        OutputFormat::Human => {
            if cli.quiet {
                return Ok(());
            }

            match summary.base_asset_id {
                None => {}
                Some(base) => {
                    println!(
                        "Processed {} duplicate(s) of asset {}{}",
                        summary.duplicates_processed,
                        base,
                        if summary.capped_early {
                            " (stopped at the removal limit)"
                        } else {
                            ""
                        }
                    );
                    if summary.duplicates_skipped_with_remaining_references > 0 {
                        println!(
                            "{} duplicate(s) still had references and were kept",
                            summary.duplicates_skipped_with_remaining_references
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
