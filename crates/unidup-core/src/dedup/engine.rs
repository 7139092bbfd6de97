//! Run controller
//!
//! Orchestrates one reconciliation run: resolve the target group, select
//! the canonical asset, then rewrite and reclaim each remaining member in
//! ascending-id order under the removal cap. The canonical asset itself is
//! only touched once, at the very end of an uncapped run, when its storage
//! key is normalized to `<id>.<extension>`.

use serde::Serialize;

use super::{canonical, groups, reclaim, rewrite::Rewriter, ReclaimOutcome};
use crate::error::{Result, UnidupError};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::store::Store;

/// A confirmed run request, as handed over by the CLI layer
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Deduplicate this asset's group instead of the largest group.
    /// The given asset may still not end up as the canonical one.
    pub target_asset_id: Option<i64>,

    /// Cap on how many duplicates this run may remove
    pub removal_limit: Option<usize>,

    /// Restrict which gallery fields get persisted on save
    pub save_fields: Option<Vec<String>>,

    /// Destructive steps refuse to run without this gate
    pub confirmed: bool,
}

/// Final summary of a run
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunSummary {
    pub base_asset_id: Option<i64>,
    pub duplicates_processed: usize,
    pub duplicates_skipped_with_remaining_references: usize,
    pub capped_early: bool,
}

impl RunSummary {
    fn no_duplicates() -> Self {
        Self {
            base_asset_id: None,
            duplicates_processed: 0,
            duplicates_skipped_with_remaining_references: 0,
            capped_early: false,
        }
    }
}

/// Execute one reconciliation run
pub fn run(
    store: &Store,
    request: &RunRequest,
    progress: &mut dyn ProgressSink,
) -> Result<RunSummary> {
    if !request.confirmed {
        return Err(UnidupError::NotConfirmed);
    }

    let db = store.db();

    let Some((fingerprint, members)) = groups::resolve_target(db, request.target_asset_id)? else {
        progress.event(ProgressEvent::info("No duplicate assets detected!"));
        return Ok(RunSummary::no_duplicates());
    };

    // The canonical asset counts as a member too
    let duplicate_count = members.len().saturating_sub(1);
    if duplicate_count == 0 {
        progress.event(ProgressEvent::info(match request.target_asset_id {
            Some(_) => "Specified asset has no duplicates!",
            None => "No duplicate assets detected!",
        }));
        return Ok(RunSummary::no_duplicates());
    }

    let base = canonical::select_base(store, &members, &fingerprint, progress)?;

    progress.event(ProgressEvent::info(match request.target_asset_id {
        Some(_) => format!(
            "Specified asset has {} duplicates. Using {} as the unified asset.",
            duplicate_count, base.storage_key
        ),
        None => format!(
            "Found asset ({}) with {} duplicates",
            base.storage_key, duplicate_count
        ),
    }));

    let rewriter = Rewriter::new(db, request.save_fields.clone())?;

    let cap = request.removal_limit.filter(|&l| l > 0);
    progress.begin(match cap {
        Some(limit) => duplicate_count.min(limit) as u64,
        None => duplicate_count as u64,
    });

    let mut processed = 0;
    let mut skipped = 0;
    let mut capped_early = false;

    for &member in &members {
        if member == base.id {
            continue;
        }

        tracing::debug!(asset_id = member, "replacing all references to duplicate");

        rewriter.replace_asset(db, member, &base, progress)?;
        if let ReclaimOutcome::SkippedReferences(_) = reclaim::reclaim(store, member, progress)? {
            skipped += 1;
        }

        processed += 1;
        progress.advance();

        if let Some(limit) = cap {
            if processed >= limit && processed < duplicate_count {
                progress.event(ProgressEvent::info(format!(
                    "The limit ({} duplicates) has been reached. Stopping here.",
                    limit
                )));
                capped_early = true;
                break;
            }
        }
    }

    if !capped_early {
        finalize_storage_key(store, &base, progress)?;
    }

    Ok(RunSummary {
        base_asset_id: Some(base.id),
        duplicates_processed: processed,
        duplicates_skipped_with_remaining_references: skipped,
        capped_early,
    })
}

/// Rename the canonical asset's payload to the stable id-based key.
/// Runs once, after all member processing, and only on complete runs.
/// Skipped when another row or a stray file already holds the normalized
/// key; a rename would clobber that payload. The row is updated before
/// the file moves.
fn finalize_storage_key(
    store: &Store,
    base: &crate::asset::Asset,
    progress: &mut dyn ProgressSink,
) -> Result<()> {
    let normalized = base.normalized_key();
    if normalized == base.storage_key {
        return Ok(());
    }

    if store.db().storage_key_in_use(&normalized)? || store.blob_path(&normalized).is_file() {
        progress.event(ProgressEvent::warn(format!(
            "storage key {} is already in use; keeping {}",
            normalized, base.storage_key
        )));
        return Ok(());
    }

    store.db().update_storage_key(base.id, &normalized)?;
    store.rename_blob(&base.storage_key, &normalized)?;

    progress.event(ProgressEvent::info(format!(
        "Renamed unified asset {} to {}",
        base.storage_key, normalized
    )));

    Ok(())
}
