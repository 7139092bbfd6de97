//! Reference rewriting
//!
//! Discovers every record referencing a duplicate asset through a gallery
//! field and repoints the matching entry at the canonical asset, leaving
//! entry-local metadata untouched. Only the first matching entry per field
//! per record is fixed; a field holding the same stale id twice is not an
//! expected state.

use crate::asset::Asset;
use crate::db::Database;
use crate::error::Result;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::record::Record;
use crate::schema::SchemaDescriptor;

/// Gallery reference rewriter. Scans the schema registry once and is
/// reused for every member of the run.
#[derive(Debug)]
pub struct Rewriter {
    schemas: Vec<SchemaDescriptor>,
    save_fields: Option<Vec<String>>,
}

impl Rewriter {
    pub fn new(db: &Database, save_fields: Option<Vec<String>>) -> Result<Self> {
        let schemas = db.gallery_schemas()?;
        tracing::debug!(
            schema_count = schemas.len(),
            "scanned schema registry for gallery fields"
        );
        Ok(Self {
            schemas,
            save_fields,
        })
    }

    pub fn schemas(&self) -> &[SchemaDescriptor] {
        &self.schemas
    }

    /// Gallery fields of a schema that the run request allows persisting
    fn selected_fields(&self, schema: &SchemaDescriptor) -> Vec<String> {
        match &self.save_fields {
            None => schema.gallery_fields.clone(),
            Some(selector) => schema
                .gallery_fields
                .iter()
                .filter(|f| selector.contains(f))
                .cloned()
                .collect(),
        }
    }

    /// Repoint every gallery reference to `old_asset_id` at the canonical
    /// asset. Returns how many entries were fixed. Persist failures
    /// propagate; nothing is retried silently.
    pub fn replace_asset(
        &self,
        db: &Database,
        old_asset_id: i64,
        canonical: &Asset,
        progress: &mut dyn ProgressSink,
    ) -> Result<usize> {
        let mut total_fixed = 0;

        for schema in &self.schemas {
            let fields = self.selected_fields(schema);
            if fields.is_empty() {
                continue;
            }

            for mut record in db.records_referencing(old_asset_id, &schema.name)? {
                let fixed = rewrite_record(&mut record, &fields, old_asset_id, canonical.id)?;
                if fixed == 0 {
                    continue;
                }

                db.persist_record(&record, &schema.gallery_fields)?;

                // Audit trail: this mutation is irreversible
                progress.event(ProgressEvent::info(format!(
                    "record {} ({}): fixed {} gallery {} referencing asset {}",
                    record.id,
                    record.schema,
                    fixed,
                    if fixed == 1 { "entry" } else { "entries" },
                    old_asset_id
                )));

                total_fixed += fixed;
            }
        }

        Ok(total_fixed)
    }
}

/// Fix the first entry matching the stale id in each named field.
/// Returns the number of fields that changed.
fn rewrite_record(
    record: &mut Record,
    fields: &[String],
    old_asset_id: i64,
    new_asset_id: i64,
) -> Result<usize> {
    let mut fixed = 0;

    for field in fields {
        let mut entries = record.gallery(field)?;
        if let Some(pos) = entries.iter().position(|e| e.asset == old_asset_id) {
            entries[pos].asset = new_asset_id;
            record.set_gallery(field, entries)?;
            fixed += 1;
        }
    }

    Ok(fixed)
}
