//! `unidup init` command - create a new store
//!
//! Idempotent: running it against an existing store just opens it.

use crate::cli::{Cli, OutputFormat};
use unidup_core::error::Result;
use unidup_core::store::Store;

/// Execute the init command
pub fn execute(cli: &Cli) -> Result<()> {
    let store = Store::init_at(&cli.store)?;

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "ok",
                "store": store.root().display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                println!("Initialized unidup store at {}", store.root().display());
            }
        }
    }

    Ok(())
}
