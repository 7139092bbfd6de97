//! Duplicate group resolution
//!
//! A group is the set of assets whose latest-version fingerprint matches,
//! ordered ascending by id. Membership comes strictly from latest
//! versions; an asset whose payload changed after being duplicated never
//! shows up under its old fingerprint.

use crate::db::Database;
use crate::error::{Result, UnidupError};

/// Resolve the target fingerprint and its members.
///
/// Explicit-asset mode resolves that asset's latest fingerprint and fails
/// with an error if it has no eligible version. Default mode picks the
/// largest group, or returns None when the store has no eligible versions
/// at all.
pub fn resolve_target(db: &Database, target_asset_id: Option<i64>) -> Result<Option<(String, Vec<i64>)>> {
    let fingerprint = match target_asset_id {
        Some(id) => match db.latest_fingerprint(id)? {
            Some(fingerprint) => fingerprint,
            None => return Err(UnidupError::NoEligibleVersion { id }),
        },
        None => match db.most_duplicated_fingerprint()? {
            Some((fingerprint, _)) => fingerprint,
            None => return Ok(None),
        },
    };

    let members = db.group_members(&fingerprint)?;
    Ok(Some((fingerprint, members)))
}
