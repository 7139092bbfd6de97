//! Dependency edge queries
//!
//! Edges record which source objects reference which targets. The garbage
//! collector trusts the inbound count as the final word before deletion.

use rusqlite::params;

use crate::error::{Result, UnidupError};

impl super::Database {
    /// Count inbound references of kind "asset" targeting the given asset
    pub fn inbound_asset_references(&self, asset_id: i64) -> Result<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(1) FROM dependencies
                 WHERE target_type = 'asset' AND target_id = ?1",
                params![asset_id],
                |r| r.get(0),
            )
            .map_err(|e| UnidupError::db_operation("count inbound references", e))
    }

    /// Record an edge directly. Production code derives edges from record
    /// data on persist; this direct form exists for seeding reference kinds
    /// the rewriter does not cover.
    pub fn insert_dependency(
        &self,
        source_type: &str,
        source_id: i64,
        target_type: &str,
        target_id: i64,
    ) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO dependencies
                 (source_type, source_id, target_type, target_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![source_type, source_id, target_type, target_id],
            )
            .map_err(|e| UnidupError::db_operation("insert dependency", e))?;
        Ok(())
    }
}
