//! Asset row access

use rusqlite::params;

use crate::asset::Asset;
use crate::error::{Result, UnidupError};

impl super::Database {
    /// Fetch an asset row. A missing row is a legitimate state (orphaned
    /// reference), not an error.
    pub fn get_asset(&self, id: i64) -> Result<Option<Asset>> {
        self.conn
            .query_row(
                "SELECT id, storage_key FROM assets WHERE id = ?1",
                params![id],
                |r| {
                    Ok(Asset {
                        id: r.get(0)?,
                        storage_key: r.get(1)?,
                    })
                },
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })
            .map_err(|e| UnidupError::db_operation("get asset", e))
    }

    /// Whether any asset row currently holds the given storage key
    pub fn storage_key_in_use(&self, storage_key: &str) -> Result<bool> {
        self.conn
            .query_row(
                "SELECT COUNT(1) FROM assets WHERE storage_key = ?1",
                params![storage_key],
                |r| r.get::<_, i64>(0),
            )
            .map(|n| n > 0)
            .map_err(|e| UnidupError::db_operation("check storage key", e))
    }

    /// Update an asset's storage key, bumping its updated timestamp
    pub fn update_storage_key(&self, id: i64, storage_key: &str) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE assets SET storage_key = ?2, updated = datetime('now') WHERE id = ?1",
                params![id, storage_key],
            )
            .map_err(|e| UnidupError::target_operation("update storage key for", format!("asset {}", id), e))?;

        if changed == 0 {
            return Err(UnidupError::AssetNotFound { id });
        }

        Ok(())
    }

    /// Delete an asset row
    pub fn delete_asset(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM assets WHERE id = ?1", params![id])
            .map_err(|e| UnidupError::target_operation("delete", format!("asset {}", id), e))?;
        Ok(())
    }
}
