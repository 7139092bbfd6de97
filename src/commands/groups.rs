//! `unidup groups` command - read-only duplicate group report
//!
//! Answers "how many duplicate files are there?" before committing to a
//! destructive run.

use crate::cli::{Cli, OutputFormat};
use crate::commands::GroupsArgs;
use unidup_core::error::Result;
use unidup_core::store::Store;

/// Execute the groups command
pub fn execute(cli: &Cli, args: &GroupsArgs) -> Result<()> {
    let store = Store::open(&cli.store)?;
    let groups = store.db().duplicate_groups(args.limit)?;

    match cli.format {
        OutputFormat::Json => {
            let mut output = Vec::with_capacity(groups.len());
            for group in &groups {
                let members = store.db().group_members(&group.fingerprint)?;
                output.push(serde_json::json!({
                    "fingerprint": group.fingerprint,
                    "member_count": group.member_count,
                    "members": members,
                }));
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if groups.is_empty() {
                println!("No duplicate assets detected!");
                return Ok(());
            }

            for group in &groups {
                let members = store.db().group_members(&group.fingerprint)?;
                let ids: Vec<String> = members.iter().map(|id| id.to_string()).collect();
                println!(
                    "{}  {} members  [{}]",
                    group.fingerprint,
                    group.member_count,
                    ids.join(", ")
                );
            }
        }
    }

    Ok(())
}
