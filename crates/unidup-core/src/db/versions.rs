//! Version history queries
//!
//! The version log is append-only and one asset with thirty versions shows
//! up thirty times in a raw scan. Every grouping query therefore inner
//! joins against a group-by-max subquery that pins each asset to its most
//! recent version, which is the only row whose fingerprint can be trusted.
//!
//! Versions with a `stored_binary_id` delegate their payload to the shared
//! binary store, which already deduplicates, so they are out of scope.

use rusqlite::params;

use crate::error::{Result, UnidupError};

/// One duplicate group as reported by the read-only `groups` listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub fingerprint: String,
    pub member_count: i64,
}

/// A redundant per-version binary snapshot, paired with the earliest
/// version row holding the same inline fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateVersionBinary {
    pub version_id: i64,
    pub canonical_version_id: i64,
}

const LATEST_VERSION_SUBQUERY: &str =
    "SELECT cid, MAX(version_count) AS version FROM versions WHERE ctype = 'asset' GROUP BY cid";

impl super::Database {
    /// Latest-version fingerprint of one asset, or None when the asset has
    /// no eligible version (no history, inline hash missing, or payload
    /// delegated to the shared binary store).
    pub fn latest_fingerprint(&self, asset_id: i64) -> Result<Option<String>> {
        let sql = format!(
            "SELECT v.binary_hash
             FROM versions v
             INNER JOIN ({LATEST_VERSION_SUBQUERY}) latest
                 ON v.cid = latest.cid AND v.version_count = latest.version
             WHERE v.ctype = 'asset' AND v.cid = ?1
               AND v.binary_hash IS NOT NULL AND v.stored_binary_id IS NULL"
        );

        let fingerprint = self
            .conn
            .query_row(&sql, params![asset_id], |r| r.get(0))
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })
            .map_err(|e| UnidupError::db_operation("resolve latest fingerprint", e))?;

        Ok(fingerprint)
    }

    /// Fingerprint whose group has the most members, with the member count.
    /// Ties break deterministically toward the lowest fingerprint.
    pub fn most_duplicated_fingerprint(&self) -> Result<Option<(String, i64)>> {
        let sql = format!(
            "SELECT v.binary_hash, COUNT(1) AS members
             FROM versions v
             INNER JOIN ({LATEST_VERSION_SUBQUERY}) latest
                 ON v.cid = latest.cid AND v.version_count = latest.version
             WHERE v.ctype = 'asset'
               AND v.binary_hash IS NOT NULL AND v.stored_binary_id IS NULL
             GROUP BY v.binary_hash
             ORDER BY members DESC, v.binary_hash ASC
             LIMIT 1"
        );

        let row = self
            .conn
            .query_row(&sql, [], |r| Ok((r.get(0)?, r.get(1)?)))
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })
            .map_err(|e| UnidupError::db_operation("find most duplicated fingerprint", e))?;

        Ok(row)
    }

    /// Asset ids whose latest version carries the given fingerprint,
    /// ascending by id. Deliberately does not join `assets`: members whose
    /// row has gone missing must still surface so their orphaned version
    /// rows get cleaned up.
    pub fn group_members(&self, fingerprint: &str) -> Result<Vec<i64>> {
        let sql = format!(
            "SELECT v.cid
             FROM versions v
             INNER JOIN ({LATEST_VERSION_SUBQUERY}) latest
                 ON v.cid = latest.cid AND v.version_count = latest.version
             WHERE v.ctype = 'asset' AND v.binary_hash = ?1
               AND v.stored_binary_id IS NULL
             ORDER BY v.cid ASC"
        );

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| UnidupError::db_operation("prepare group members query", e))?;

        let members = stmt
            .query_map(params![fingerprint], |r| r.get(0))
            .map_err(|e| UnidupError::db_operation("execute group members query", e))?
            .collect::<std::result::Result<Vec<i64>, _>>()
            .map_err(|e| UnidupError::db_operation("read group member", e))?;

        Ok(members)
    }

    /// Duplicate groups ordered largest first, for the read-only report.
    /// Single-member groups are not duplicates and are not listed.
    pub fn duplicate_groups(&self, limit: usize) -> Result<Vec<DuplicateGroup>> {
        let sql = format!(
            "SELECT v.binary_hash, COUNT(1) AS members
             FROM versions v
             INNER JOIN ({LATEST_VERSION_SUBQUERY}) latest
                 ON v.cid = latest.cid AND v.version_count = latest.version
             WHERE v.ctype = 'asset'
               AND v.binary_hash IS NOT NULL AND v.stored_binary_id IS NULL
             GROUP BY v.binary_hash
             HAVING COUNT(1) > 1
             ORDER BY members DESC, v.binary_hash ASC
             LIMIT ?1"
        );

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| UnidupError::db_operation("prepare duplicate groups query", e))?;

        let groups = stmt
            .query_map(params![limit as i64], |r| {
                Ok(DuplicateGroup {
                    fingerprint: r.get(0)?,
                    member_count: r.get(1)?,
                })
            })
            .map_err(|e| UnidupError::db_operation("execute duplicate groups query", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| UnidupError::db_operation("read duplicate group", e))?;

        Ok(groups)
    }

    /// Delete every version row of an asset, one row at a time. A failure
    /// on one row is reported and the loop continues; returns how many rows
    /// were actually deleted.
    pub fn delete_asset_versions(&self, asset_id: i64) -> Result<usize> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM versions WHERE cid = ?1 AND ctype = 'asset'")
            .map_err(|e| UnidupError::db_operation("prepare version id query", e))?;

        let ids = stmt
            .query_map(params![asset_id], |r| r.get(0))
            .map_err(|e| UnidupError::db_operation("execute version id query", e))?
            .collect::<std::result::Result<Vec<i64>, _>>()
            .map_err(|e| UnidupError::db_operation("read version id", e))?;

        let mut deleted = 0;
        for id in ids {
            match self
                .conn
                .execute("DELETE FROM versions WHERE id = ?1", params![id])
            {
                Ok(_) => deleted += 1,
                Err(e) => {
                    tracing::warn!(version_id = id, asset_id, "failed to delete version row: {}", e);
                }
            }
        }

        Ok(deleted)
    }

    /// Version rows whose inline binary duplicates an earlier row's binary.
    /// The earliest row per fingerprint is canonical.
    pub fn duplicate_version_binaries(&self) -> Result<Vec<DuplicateVersionBinary>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT v.id, vg.min_id
                 FROM versions v
                 INNER JOIN (
                     SELECT MIN(id) AS min_id, binary_hash
                     FROM versions
                     WHERE stored_binary_id IS NULL AND binary_hash IS NOT NULL
                     GROUP BY binary_hash
                 ) vg ON vg.binary_hash = v.binary_hash
                 WHERE v.id <> vg.min_id AND v.stored_binary_id IS NULL
                 ORDER BY v.id ASC",
            )
            .map_err(|e| UnidupError::db_operation("prepare duplicate version query", e))?;

        let rows = stmt
            .query_map([], |r| {
                Ok(DuplicateVersionBinary {
                    version_id: r.get(0)?,
                    canonical_version_id: r.get(1)?,
                })
            })
            .map_err(|e| UnidupError::db_operation("execute duplicate version query", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| UnidupError::db_operation("read duplicate version row", e))?;

        Ok(rows)
    }

    /// Repoint a version row's binary at another version's stored binary.
    /// The database side goes first: if the snapshot file deletion fails
    /// afterwards, the store is still consistent.
    pub fn repoint_version_binary(&self, version_id: i64, canonical_version_id: i64) -> Result<()> {
        self.conn
            .execute(
                "UPDATE versions SET stored_binary_id = ?2 WHERE id = ?1",
                params![version_id, canonical_version_id],
            )
            .map_err(|e| UnidupError::db_operation("repoint version binary", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::testutil;

    #[test]
    fn latest_fingerprint_ignores_stale_versions() {
        let (_dir, store) = testutil::temp_store();
        testutil::seed_asset(&store, 5, "a.jpg");
        // Asset 5 was a duplicate of "abc" at v1 but changed at v2
        testutil::seed_version(&store, 5, 1, Some("abc"), None);
        testutil::seed_version(&store, 5, 2, Some("def"), None);

        assert_eq!(
            store.db().latest_fingerprint(5).unwrap(),
            Some("def".to_string())
        );
    }

    #[test]
    fn latest_fingerprint_excludes_shared_binary_store() {
        let (_dir, store) = testutil::temp_store();
        testutil::seed_asset(&store, 5, "a.jpg");
        testutil::seed_version(&store, 5, 1, Some("abc"), Some(99));

        assert_eq!(store.db().latest_fingerprint(5).unwrap(), None);
    }

    #[test]
    fn group_members_come_back_ascending() {
        let (_dir, store) = testutil::temp_store();
        for id in [12, 5, 9] {
            testutil::seed_asset(&store, id, &format!("{id}.jpg"));
            testutil::seed_version(&store, id, 1, Some("abc"), None);
        }

        assert_eq!(store.db().group_members("abc").unwrap(), vec![5, 9, 12]);
        // Idempotent absent concurrent writes
        assert_eq!(store.db().group_members("abc").unwrap(), vec![5, 9, 12]);
    }

    #[test]
    fn grouping_uses_only_latest_versions() {
        let (_dir, store) = testutil::temp_store();
        // Two real duplicates of "abc"
        for id in [1, 2] {
            testutil::seed_asset(&store, id, &format!("{id}.jpg"));
            testutil::seed_version(&store, id, 1, Some("abc"), None);
        }
        // Asset 3 left the group at v2; its stale v1 must not count
        testutil::seed_asset(&store, 3, "3.jpg");
        testutil::seed_version(&store, 3, 1, Some("abc"), None);
        testutil::seed_version(&store, 3, 2, Some("zzz"), None);

        let (fingerprint, members) = store.db().most_duplicated_fingerprint().unwrap().unwrap();
        assert_eq!(fingerprint, "abc");
        assert_eq!(members, 2);
        assert_eq!(store.db().group_members("abc").unwrap(), vec![1, 2]);
    }

    #[test]
    fn most_duplicated_tie_breaks_to_lowest_fingerprint() {
        let (_dir, store) = testutil::temp_store();
        for (id, hash) in [(1, "bbb"), (2, "bbb"), (3, "aaa"), (4, "aaa")] {
            testutil::seed_asset(&store, id, &format!("{id}.jpg"));
            testutil::seed_version(&store, id, 1, Some(hash), None);
        }

        let (fingerprint, members) = store.db().most_duplicated_fingerprint().unwrap().unwrap();
        assert_eq!(fingerprint, "aaa");
        assert_eq!(members, 2);
    }

    #[test]
    fn duplicate_groups_skips_singletons() {
        let (_dir, store) = testutil::temp_store();
        for (id, hash) in [(1, "aaa"), (2, "aaa"), (3, "solo")] {
            testutil::seed_asset(&store, id, &format!("{id}.jpg"));
            testutil::seed_version(&store, id, 1, Some(hash), None);
        }

        let groups = store.db().duplicate_groups(10).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].fingerprint, "aaa");
        assert_eq!(groups[0].member_count, 2);
    }

    #[test]
    fn duplicate_version_binaries_keep_earliest() {
        let (_dir, store) = testutil::temp_store();
        testutil::seed_asset(&store, 1, "1.jpg");
        testutil::seed_version(&store, 1, 1, Some("abc"), None);
        testutil::seed_version(&store, 1, 2, Some("abc"), None);
        testutil::seed_version(&store, 1, 3, Some("other"), None);

        let dupes = store.db().duplicate_version_binaries().unwrap();
        assert_eq!(dupes.len(), 1);
        assert_eq!(dupes[0].canonical_version_id, 1);
        assert_eq!(dupes[0].version_id, 2);
    }
}
