//! Store path layout

use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.toml";
pub const BLOBS_DIR: &str = "blobs";
pub const VERSIONS_DIR: &str = "versions";

/// Path of an asset payload inside the store
pub fn blob_path(store_root: &Path, storage_key: &str) -> PathBuf {
    store_root.join(BLOBS_DIR).join(storage_key)
}

/// Path of a per-version binary snapshot inside the store
pub fn version_binary_path(store_root: &Path, version_id: i64) -> PathBuf {
    store_root
        .join(VERSIONS_DIR)
        .join(format!("{}.bin", version_id))
}
