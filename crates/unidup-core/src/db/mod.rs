//! SQLite database module for unidup

mod assets;
mod dependencies;
mod records;
mod schema;
mod versions;

use crate::error::{Result, UnidupError};
use rusqlite::Connection;
use std::path::Path;

pub use schema::create_schema;
pub use versions::{DuplicateGroup, DuplicateVersionBinary};

pub const DB_FILE: &str = "unidup.db";

/// SQLite database for unidup
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at the given store root
    pub fn open(store_root: &Path) -> Result<Self> {
        let db_path = store_root.join(DB_FILE);

        let conn = Connection::open(&db_path).map_err(|e| {
            UnidupError::Other(format!(
                "failed to open database at {}: {}",
                db_path.display(),
                e
            ))
        })?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| UnidupError::Other(format!("failed to enable WAL mode: {}", e)))?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| UnidupError::Other(format!("failed to enable foreign keys: {}", e)))?;

        create_schema(&conn)?;

        Ok(Database { conn })
    }

    pub fn get_asset_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM assets", [], |r| r.get(0))
            .map_err(|e| UnidupError::db_operation("get asset count", e))
    }

    pub fn get_record_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM records", [], |r| r.get(0))
            .map_err(|e| UnidupError::db_operation("get record count", e))
    }

    pub fn get_version_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM versions", [], |r| r.get(0))
            .map_err(|e| UnidupError::db_operation("get version count", e))
    }

    #[cfg(test)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        // Checkpoint WAL so rapid open/close sequences see committed data
        let _ = self.conn.pragma_update(None, "wal_checkpoint", "TRUNCATE");
    }
}
