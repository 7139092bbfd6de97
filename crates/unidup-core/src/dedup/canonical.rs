//! Canonical asset selection
//!
//! Walks a duplicate group in the order given and picks the first member
//! whose payload is actually retrievable. Row-without-payload and
//! payload-without-row are both real states in a partially-corrupt store;
//! both get skipped with a warning. If nothing is retrievable, every copy
//! of the group is corrupt and the run must abort before any mutation.

use crate::asset::Asset;
use crate::error::{Result, UnidupError};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::store::Store;

/// Select the surviving representative of a duplicate group
pub fn select_base(
    store: &Store,
    members: &[i64],
    fingerprint: &str,
    progress: &mut dyn ProgressSink,
) -> Result<Asset> {
    for &id in members {
        match store.db().get_asset(id)? {
            None => {
                progress.event(ProgressEvent::warn(format!(
                    "asset {} has version history but no asset row, skipping as canonical candidate",
                    id
                )));
            }
            Some(asset) => {
                if store.payload_exists(&asset) {
                    return Ok(asset);
                }
                progress.event(ProgressEvent::warn(format!(
                    "asset {} ({}) has no payload on disk, skipping as canonical candidate",
                    id, asset.storage_key
                )));
            }
        }
    }

    Err(UnidupError::AllCandidatesInvalid {
        fingerprint: fingerprint.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{Level, RecordingSink};
    use crate::testutil;

    #[test]
    fn first_member_with_payload_wins() {
        let (_dir, store) = testutil::temp_store();
        for id in [5, 9, 12] {
            testutil::seed_asset(&store, id, &format!("{id}.jpg"));
            testutil::seed_version(&store, id, 1, Some("abc"), None);
        }
        // Asset 5's row exists but its payload is gone
        testutil::write_blob(&store, "9.jpg", b"pixels");
        testutil::write_blob(&store, "12.jpg", b"pixels");

        let mut sink = RecordingSink::new();
        let base = select_base(&store, &[5, 9, 12], "abc", &mut sink).unwrap();
        assert_eq!(base.id, 9);
        assert_eq!(sink.messages_at(Level::Warn).len(), 1);
    }

    #[test]
    fn missing_row_is_skipped_not_fatal() {
        let (_dir, store) = testutil::temp_store();
        testutil::seed_asset(&store, 9, "9.jpg");
        testutil::write_blob(&store, "9.jpg", b"pixels");

        let mut sink = RecordingSink::new();
        // Member 5 has no asset row at all
        let base = select_base(&store, &[5, 9], "abc", &mut sink).unwrap();
        assert_eq!(base.id, 9);
    }

    #[test]
    fn all_corrupt_aborts() {
        let (_dir, store) = testutil::temp_store();
        testutil::seed_asset(&store, 5, "5.jpg");
        testutil::seed_asset(&store, 9, "9.jpg");

        let mut sink = RecordingSink::new();
        assert!(matches!(
            select_base(&store, &[5, 9], "abc", &mut sink),
            Err(UnidupError::AllCandidatesInvalid { .. })
        ));
    }
}
