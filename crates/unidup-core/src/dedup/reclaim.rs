//! Garbage collection of processed duplicates
//!
//! A duplicate is deleted only after its inbound reference count, recomputed
//! after rewriting, reaches zero. A nonzero count here means some reference
//! kind escaped the rewriter (for example a field type outside gallery
//! scanning); the asset is kept and a warning names it.

use crate::error::Result;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::store::Store;

/// What happened to one duplicate member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReclaimOutcome {
    /// Asset row, payload and version history removed
    Deleted,
    /// Still referenced after rewriting; left in place
    SkippedReferences(i64),
    /// Asset row was already missing; orphaned version rows cleaned up
    OrphanCleaned(usize),
}

/// Reclaim one duplicate member after its references were rewritten
pub fn reclaim(
    store: &Store,
    asset_id: i64,
    progress: &mut dyn ProgressSink,
) -> Result<ReclaimOutcome> {
    let db = store.db();

    let Some(asset) = db.get_asset(asset_id)? else {
        let removed = db.delete_asset_versions(asset_id)?;
        progress.event(ProgressEvent::warn(format!(
            "asset {} row is already gone; cleaned up {} orphaned version row(s)",
            asset_id, removed
        )));
        return Ok(ReclaimOutcome::OrphanCleaned(removed));
    };

    let remaining = db.inbound_asset_references(asset_id)?;
    if remaining > 0 {
        progress.event(ProgressEvent::warn(format!(
            "{} still has {} reference(s) and will not be deleted",
            asset.storage_key, remaining
        )));
        return Ok(ReclaimOutcome::SkippedReferences(remaining));
    }

    db.delete_asset(asset_id)?;
    store.remove_blob(&asset.storage_key)?;
    let removed = db.delete_asset_versions(asset_id)?;
    tracing::debug!(asset_id, versions_removed = removed, "reclaimed duplicate asset");

    Ok(ReclaimOutcome::Deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{Level, RecordingSink};
    use crate::testutil;

    #[test]
    fn unreferenced_asset_is_fully_removed() {
        let (_dir, store) = testutil::temp_store();
        testutil::seed_asset(&store, 5, "5.jpg");
        testutil::seed_version(&store, 5, 1, Some("abc"), None);
        testutil::seed_version(&store, 5, 2, Some("abc"), None);
        testutil::write_blob(&store, "5.jpg", b"pixels");

        let mut sink = RecordingSink::new();
        let outcome = reclaim(&store, 5, &mut sink).unwrap();
        assert_eq!(outcome, ReclaimOutcome::Deleted);

        assert_eq!(store.db().get_asset(5).unwrap(), None);
        assert_eq!(store.db().get_version_count().unwrap(), 0);
        assert!(!store.blob_path("5.jpg").exists());
    }

    #[test]
    fn referenced_asset_is_kept_with_warning() {
        let (_dir, store) = testutil::temp_store();
        testutil::seed_asset(&store, 5, "5.jpg");
        testutil::seed_version(&store, 5, 1, Some("abc"), None);
        store
            .db()
            .insert_dependency("record", 77, "asset", 5)
            .unwrap();

        let mut sink = RecordingSink::new();
        let outcome = reclaim(&store, 5, &mut sink).unwrap();
        assert_eq!(outcome, ReclaimOutcome::SkippedReferences(1));

        assert!(store.db().get_asset(5).unwrap().is_some());
        assert_eq!(store.db().get_version_count().unwrap(), 1);
        assert_eq!(sink.messages_at(Level::Warn).len(), 1);
    }

    #[test]
    fn missing_row_still_cleans_orphaned_versions() {
        let (_dir, store) = testutil::temp_store();
        // Version rows without an asset row: a previously half-deleted asset
        testutil::seed_version(&store, 5, 1, Some("abc"), None);
        testutil::seed_version(&store, 5, 2, Some("abc"), None);

        let mut sink = RecordingSink::new();
        let outcome = reclaim(&store, 5, &mut sink).unwrap();
        assert_eq!(outcome, ReclaimOutcome::OrphanCleaned(2));
        assert_eq!(store.db().get_version_count().unwrap(), 0);
    }
}
