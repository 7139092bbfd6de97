//! Referring record model
//!
//! Records are schema-typed structured objects stored as JSON in the
//! `records` table. A gallery field holds an ordered array of entries,
//! each wrapping one asset reference plus entry-local metadata (hotspots,
//! crop, captions). Rewriting repoints the reference and must leave that
//! metadata untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, UnidupError};

/// One entry of a gallery field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryEntry {
    /// Referenced asset id
    pub asset: i64,

    /// Entry-local metadata, carried through rewrites verbatim
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

impl GalleryEntry {
    pub fn new(asset: i64) -> Self {
        Self {
            asset,
            meta: Map::new(),
        }
    }
}

/// A structured record owning zero or more gallery fields
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: i64,
    pub schema: String,
    /// Drafts are false. Rewriting covers both states.
    pub published: bool,
    pub data: Map<String, Value>,
}

impl Record {
    /// Parse a named gallery field. An absent field reads as empty.
    pub fn gallery(&self, field: &str) -> Result<Vec<GalleryEntry>> {
        let Some(value) = self.data.get(field) else {
            return Ok(Vec::new());
        };

        let entries: Vec<GalleryEntry> =
            serde_json::from_value(value.clone()).map_err(|e| UnidupError::target_operation(
                "parse gallery field",
                format!("{}.{} (record {})", self.schema, field, self.id),
                e,
            ))?;

        Ok(entries)
    }

    /// Replace a named gallery field
    pub fn set_gallery(&mut self, field: &str, entries: Vec<GalleryEntry>) -> Result<()> {
        let value = serde_json::to_value(entries)?;
        self.data.insert(field.to_string(), value);
        Ok(())
    }

    /// Distinct asset ids referenced from the given gallery fields, in
    /// first-seen order. Used to re-derive dependency edges on persist.
    pub fn referenced_assets(&self, fields: &[String]) -> Result<Vec<i64>> {
        let mut seen = Vec::new();
        for field in fields {
            for entry in self.gallery(field)? {
                if !seen.contains(&entry.asset) {
                    seen.push(entry.asset);
                }
            }
        }
        Ok(seen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_with_gallery() -> Record {
        let data = json!({
            "title": "Spring catalog",
            "photos": [
                {"asset": 5, "hotspots": [{"x": 0.2, "y": 0.4}], "caption": "front"},
                {"asset": 12, "crop": {"w": 100, "h": 80}}
            ]
        });
        Record {
            id: 1,
            schema: "product".to_string(),
            published: true,
            data: data.as_object().unwrap().clone(),
        }
    }

    #[test]
    fn gallery_preserves_entry_metadata() {
        let record = record_with_gallery();
        let entries = record.gallery("photos").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].asset, 5);
        assert_eq!(entries[0].meta["caption"], json!("front"));
        assert_eq!(entries[1].meta["crop"], json!({"w": 100, "h": 80}));
    }

    #[test]
    fn absent_field_reads_as_empty() {
        let record = record_with_gallery();
        assert!(record.gallery("missing").unwrap().is_empty());
    }

    #[test]
    fn set_gallery_round_trips_metadata() {
        let mut record = record_with_gallery();
        let mut entries = record.gallery("photos").unwrap();
        entries[0].asset = 9;
        record.set_gallery("photos", entries).unwrap();

        let reread = record.gallery("photos").unwrap();
        assert_eq!(reread[0].asset, 9);
        assert_eq!(reread[0].meta["hotspots"], json!([{"x": 0.2, "y": 0.4}]));
        assert_eq!(reread[0].meta["caption"], json!("front"));
    }

    #[test]
    fn referenced_assets_deduplicates_across_fields() {
        let mut record = record_with_gallery();
        record
            .set_gallery("banner", vec![GalleryEntry::new(5), GalleryEntry::new(30)])
            .unwrap();

        let fields = vec!["photos".to_string(), "banner".to_string()];
        assert_eq!(record.referenced_assets(&fields).unwrap(), vec![5, 12, 30]);
    }
}
