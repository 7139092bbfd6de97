//! `unidup cleanup-versions` command
//!
//! Version rows sharing an inline binary fingerprint each keep their own
//! snapshot under `versions/`. This repoints every later row at the
//! earliest one and deletes the redundant snapshot files. The database
//! side is updated first; a snapshot deletion failing afterwards leaves
//! the store consistent.

use dialoguer::Confirm;

use crate::cli::{Cli, OutputFormat};
use crate::commands::CleanupVersionsArgs;
use unidup_core::error::{Result, UnidupError};
use unidup_core::store::Store;

/// Execute the cleanup-versions command
pub fn execute(cli: &Cli, args: &CleanupVersionsArgs) -> Result<()> {
    let store = Store::open(&cli.store)?;

    if !args.yes && !confirm()? {
        println!("Command cancelled");
        return Ok(());
    }

    let duplicates = store.db().duplicate_version_binaries()?;
    let mut removed = 0;

    for duplicate in &duplicates {
        store
            .db()
            .repoint_version_binary(duplicate.version_id, duplicate.canonical_version_id)?;

        match store.remove_version_binary(duplicate.version_id) {
            Ok(()) => {
                tracing::debug!(
                    version_id = duplicate.version_id,
                    canonical = duplicate.canonical_version_id,
                    "removed redundant version snapshot"
                );
                removed += 1;
            }
            Err(e) => {
                // Row already repointed; the stray file can be removed later
                tracing::warn!(
                    version_id = duplicate.version_id,
                    "failed to remove version snapshot: {}",
                    e
                );
            }
        }
    }

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "duplicate_versions": duplicates.len(),
                "snapshots_removed": removed,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                println!(
                    "Repointed {} duplicate version(s), removed {} snapshot(s)",
                    duplicates.len(),
                    removed
                );
            }
        }
    }

    Ok(())
}

fn confirm() -> Result<bool> {
    Confirm::new()
        .with_prompt("This command cannot be undone. Are you sure you want to continue?")
        .default(false)
        .interact()
        .map_err(|e| UnidupError::UsageError(format!("failed to read confirmation: {}", e)))
}
