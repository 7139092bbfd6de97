use assert_cmd::{cargo::cargo_bin_cmd, Command};
use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;

pub fn unidup() -> Command {
    cargo_bin_cmd!("unidup")
}

/// Initialize a store and return a connection for seeding
pub fn init_store(store_dir: &Path) -> Connection {
    unidup()
        .arg("--store")
        .arg(store_dir)
        .arg("init")
        .assert()
        .success();

    open_db(store_dir)
}

pub fn open_db(store_dir: &Path) -> Connection {
    Connection::open(store_dir.join("unidup.db")).expect("failed to open store database")
}

pub fn seed_asset(conn: &Connection, id: i64, storage_key: &str) {
    conn.execute(
        "INSERT INTO assets (id, storage_key, created) VALUES (?1, ?2, datetime('now'))",
        params![id, storage_key],
    )
    .unwrap();
}

pub fn seed_version(conn: &Connection, cid: i64, version_count: i64, binary_hash: &str) {
    conn.execute(
        "INSERT INTO versions (cid, ctype, version_count, binary_hash, created)
         VALUES (?1, 'asset', ?2, ?3, datetime('now'))",
        params![cid, version_count, binary_hash],
    )
    .unwrap();
}

#[allow(dead_code)]
pub fn seed_gallery_schema(conn: &Connection, name: &str, field: &str) {
    let fields = serde_json::json!([{"name": field, "field_type": "asset_gallery"}]);
    conn.execute(
        "INSERT INTO schemas (name, fields) VALUES (?1, ?2)",
        params![name, fields.to_string()],
    )
    .unwrap();
}

/// Insert a record whose named gallery field references the given assets,
/// along with the matching dependency edges
#[allow(dead_code)]
pub fn seed_gallery_record(
    conn: &Connection,
    id: i64,
    schema: &str,
    field: &str,
    entries: &serde_json::Value,
) {
    let data = serde_json::json!({ field: entries });
    conn.execute(
        "INSERT INTO records (id, schema, published, data) VALUES (?1, ?2, 1, ?3)",
        params![id, schema, data.to_string()],
    )
    .unwrap();

    for entry in entries.as_array().unwrap() {
        let asset_id = entry["asset"].as_i64().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO dependencies (source_type, source_id, target_type, target_id)
             VALUES ('record', ?1, 'asset', ?2)",
            params![id, asset_id],
        )
        .unwrap();
    }
}

pub fn write_blob(store_dir: &Path, storage_key: &str, content: &[u8]) {
    let path = store_dir.join("blobs").join(storage_key);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[allow(dead_code)]
pub fn asset_exists(conn: &Connection, id: i64) -> bool {
    conn.query_row(
        "SELECT COUNT(1) FROM assets WHERE id = ?1",
        params![id],
        |r| r.get::<_, i64>(0),
    )
    .unwrap()
        > 0
}

#[allow(dead_code)]
pub fn storage_key(conn: &Connection, id: i64) -> String {
    conn.query_row(
        "SELECT storage_key FROM assets WHERE id = ?1",
        params![id],
        |r| r.get(0),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn record_data(conn: &Connection, id: i64) -> serde_json::Value {
    let data: String = conn
        .query_row("SELECT data FROM records WHERE id = ?1", params![id], |r| {
            r.get(0)
        })
        .unwrap();
    serde_json::from_str(&data).unwrap()
}
