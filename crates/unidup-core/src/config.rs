//! Store configuration
//!
//! A store carries a `config.toml` with run defaults. Missing file or
//! missing keys fall back to defaults so older stores keep working.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, UnidupError};

pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Store-level configuration loaded from `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Config format version
    pub version: u32,

    /// Default cap on how many duplicates a run may remove (0 = no cap)
    pub default_removal_limit: Option<usize>,

    /// Default restriction on which gallery fields get persisted on save
    pub default_save_fields: Option<Vec<String>>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            default_removal_limit: None,
            default_save_fields: None,
        }
    }
}

impl StoreConfig {
    /// Load configuration from the given path
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: StoreConfig = toml::from_str(&content)?;

        if config.version > CURRENT_CONFIG_VERSION {
            return Err(UnidupError::InvalidStore {
                reason: format!(
                    "config version {} is newer than supported version {}",
                    config.version, CURRENT_CONFIG_VERSION
                ),
            });
        }

        Ok(config)
    }

    /// Write configuration to the given path
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| UnidupError::db_operation("serialize store config", e))?;
        fs::write(path, content)?;
        Ok(())
    }
}
