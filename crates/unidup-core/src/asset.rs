//! Asset model
//!
//! An asset is a binary-backed object: a row in the `assets` table plus a
//! payload file under `blobs/<storage_key>`. Row presence and payload
//! presence are independent; both states occur in partially-corrupt stores.

/// A stored asset row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub id: i64,
    pub storage_key: String,
}

impl Asset {
    /// Normalized storage key after consolidation: `<id>.<original-extension>`,
    /// or just `<id>` when the current key has no extension.
    pub fn normalized_key(&self) -> String {
        match self.storage_key.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
                format!("{}.{}", self.id, ext)
            }
            _ => self.id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_key_keeps_extension() {
        let asset = Asset {
            id: 42,
            storage_key: "holiday-photo.jpg".to_string(),
        };
        assert_eq!(asset.normalized_key(), "42.jpg");
    }

    #[test]
    fn normalized_key_uses_last_extension() {
        let asset = Asset {
            id: 7,
            storage_key: "archive.tar.gz".to_string(),
        };
        assert_eq!(asset.normalized_key(), "7.gz");
    }

    #[test]
    fn normalized_key_without_extension() {
        let asset = Asset {
            id: 9,
            storage_key: "README".to_string(),
        };
        assert_eq!(asset.normalized_key(), "9");
    }
}
