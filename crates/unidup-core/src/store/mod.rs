//! Store management for unidup
//!
//! The store is the root directory containing all unidup data: the SQLite
//! database, the `blobs/` payload directory keyed by storage key, the
//! `versions/` snapshot directory, and `config.toml`.

pub mod paths;

use std::fs;
use std::path::{Path, PathBuf};

use crate::asset::Asset;
use crate::config::StoreConfig;
use crate::db::{Database, DB_FILE};
use crate::error::{Result, UnidupError};
use paths::{BLOBS_DIR, CONFIG_FILE, VERSIONS_DIR};

/// The unidup store
#[derive(Debug)]
pub struct Store {
    /// Root path of the store
    root: PathBuf,
    /// Store configuration
    config: StoreConfig,
    /// SQLite database
    db: Database,
}

impl Store {
    /// Open an existing store at the given path
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_dir() || !path.join(DB_FILE).is_file() {
            return Err(UnidupError::StoreNotFound {
                search_root: path.to_path_buf(),
            });
        }

        let config_path = path.join(CONFIG_FILE);
        let config = if config_path.exists() {
            StoreConfig::load(&config_path)?
        } else {
            StoreConfig::default()
        };

        let db = Database::open(path)?;

        Ok(Store {
            root: path.to_path_buf(),
            config,
            db,
        })
    }

    /// Initialize a store at the given path. Idempotent: existing stores
    /// are opened, not overwritten.
    pub fn init_at(path: &Path) -> Result<Self> {
        fs::create_dir_all(path)?;
        fs::create_dir_all(path.join(BLOBS_DIR))?;
        fs::create_dir_all(path.join(VERSIONS_DIR))?;

        let config_path = path.join(CONFIG_FILE);
        let config = if config_path.exists() {
            StoreConfig::load(&config_path)?
        } else {
            let config = StoreConfig::default();
            config.save(&config_path)?;
            config
        };

        let db = Database::open(path)?;

        Ok(Store {
            root: path.to_path_buf(),
            config,
            db,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Path of an asset's payload
    pub fn blob_path(&self, storage_key: &str) -> PathBuf {
        paths::blob_path(&self.root, storage_key)
    }

    /// Whether an asset's payload actually exists on disk. Checks the
    /// storage backend, not just row presence.
    pub fn payload_exists(&self, asset: &Asset) -> bool {
        self.blob_path(&asset.storage_key).is_file()
    }

    /// Delete an asset's payload. A payload that is already gone is fine;
    /// the row may have outlived the file.
    pub fn remove_blob(&self, storage_key: &str) -> Result<()> {
        match fs::remove_file(self.blob_path(storage_key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(UnidupError::target_operation("delete payload", storage_key, e)),
        }
    }

    /// Rename an asset's payload on disk
    pub fn rename_blob(&self, old_key: &str, new_key: &str) -> Result<()> {
        fs::rename(self.blob_path(old_key), self.blob_path(new_key)).map_err(|e| {
            UnidupError::target_operation("rename payload", format!("{} -> {}", old_key, new_key), e)
        })
    }

    /// Path of a per-version binary snapshot
    pub fn version_binary_path(&self, version_id: i64) -> PathBuf {
        paths::version_binary_path(&self.root, version_id)
    }

    /// Delete a redundant version snapshot. Missing snapshots are fine.
    pub fn remove_version_binary(&self, version_id: i64) -> Result<()> {
        match fs::remove_file(self.version_binary_path(version_id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(UnidupError::target_operation(
                "delete version snapshot",
                format!("{}.bin", version_id),
                e,
            )),
        }
    }
}
