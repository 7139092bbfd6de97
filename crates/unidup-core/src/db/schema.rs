//! SQLite database schema for unidup

use crate::error::{Result, UnidupError};
use rusqlite::Connection;

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

const SCHEMA_SQL: &str = r#"
-- Asset rows; payloads live under blobs/<storage_key>
CREATE TABLE IF NOT EXISTS assets (
    id INTEGER PRIMARY KEY,
    storage_key TEXT NOT NULL UNIQUE,
    created TEXT,
    updated TEXT
);

-- Append-only version log. The row with MAX(version_count) per
-- (cid, ctype) carries the authoritative fingerprint.
CREATE TABLE IF NOT EXISTS versions (
    id INTEGER PRIMARY KEY,
    cid INTEGER NOT NULL,
    ctype TEXT NOT NULL,
    version_count INTEGER NOT NULL,
    binary_hash TEXT,
    stored_binary_id INTEGER,
    created TEXT
);
CREATE INDEX IF NOT EXISTS idx_versions_cid ON versions(cid, ctype, version_count);
-- Backs the grouping aggregation; without it grouping is a full scan
CREATE INDEX IF NOT EXISTS idx_versions_hash ON versions(binary_hash, stored_binary_id);

-- Registered record schemas; fields is a JSON array of {name, field_type}
CREATE TABLE IF NOT EXISTS schemas (
    name TEXT PRIMARY KEY,
    fields TEXT NOT NULL DEFAULT '[]'
);

-- Structured records; gallery fields live inside the data JSON
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY,
    schema TEXT NOT NULL REFERENCES schemas(name),
    published INTEGER NOT NULL DEFAULT 0,
    data TEXT NOT NULL DEFAULT '{}'
);
CREATE INDEX IF NOT EXISTS idx_records_schema ON records(schema);

-- Reference edges, re-derived from record data on every persist
CREATE TABLE IF NOT EXISTS dependencies (
    source_type TEXT NOT NULL,
    source_id INTEGER NOT NULL,
    target_type TEXT NOT NULL,
    target_id INTEGER NOT NULL,
    PRIMARY KEY (source_type, source_id, target_type, target_id)
);
CREATE INDEX IF NOT EXISTS idx_deps_target ON dependencies(target_type, target_id);

-- Schema metadata
CREATE TABLE IF NOT EXISTS store_meta (
    key TEXT PRIMARY KEY,
    value TEXT
);
"#;

/// Create or verify the schema.
///
/// Unlike a derived index, the store is authoritative data, so a version
/// mismatch is an error rather than a drop-and-rebuild.
pub fn create_schema(conn: &Connection) -> Result<()> {
    let current_version: Option<i32> = conn
        .query_row(
            "SELECT value FROM store_meta WHERE key = 'schema_version'",
            [],
            |r| r.get::<_, String>(0).map(|s| s.parse().unwrap_or(0)),
        )
        .ok();

    match current_version {
        None => {
            conn.execute_batch(SCHEMA_SQL)?;
            conn.execute(
                "INSERT OR IGNORE INTO store_meta (key, value) VALUES ('schema_version', ?1)",
                [&CURRENT_SCHEMA_VERSION.to_string()],
            )?;
            Ok(())
        }
        Some(v) if v == CURRENT_SCHEMA_VERSION => Ok(()),
        Some(v) => Err(UnidupError::InvalidStore {
            reason: format!(
                "database schema version {} does not match supported version {}",
                v, CURRENT_SCHEMA_VERSION
            ),
        }),
    }
}
