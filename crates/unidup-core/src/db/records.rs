//! Record and schema registry access

use rusqlite::params;
use serde_json::{Map, Value};

use crate::error::{Result, UnidupError};
use crate::record::Record;
use crate::schema::{FieldDefinition, SchemaDescriptor};

impl super::Database {
    /// Scan the schema registry for schemas carrying gallery fields.
    /// Called once per run and cached by the rewriter.
    pub fn gallery_schemas(&self) -> Result<Vec<SchemaDescriptor>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, fields FROM schemas ORDER BY name")
            .map_err(|e| UnidupError::db_operation("prepare schema scan", e))?;

        let rows = stmt
            .query_map([], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })
            .map_err(|e| UnidupError::db_operation("execute schema scan", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| UnidupError::db_operation("read schema row", e))?;

        let mut descriptors = Vec::new();
        for (name, fields_json) in rows {
            let fields: Vec<FieldDefinition> = serde_json::from_str(&fields_json)
                .map_err(|e| UnidupError::target_operation("parse fields of", format!("schema {}", name), e))?;

            let gallery_fields: Vec<String> = fields
                .iter()
                .filter(|f| f.is_gallery())
                .map(|f| f.name.clone())
                .collect();

            if !gallery_fields.is_empty() {
                descriptors.push(SchemaDescriptor {
                    name,
                    gallery_fields,
                });
            }
        }

        Ok(descriptors)
    }

    /// Every record of `schema` with a dependency edge of kind "asset"
    /// pointing at the given asset. Drafts are included: a published-only
    /// scan would skip references and corrupt them once the duplicate is
    /// deleted.
    pub fn records_referencing(&self, asset_id: i64, schema: &str) -> Result<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT r.id, r.schema, r.published, r.data
                 FROM records r
                 INNER JOIN dependencies d
                     ON d.source_type = 'record' AND d.source_id = r.id
                 WHERE r.schema = ?1
                   AND d.target_type = 'asset' AND d.target_id = ?2
                 ORDER BY r.id ASC",
            )
            .map_err(|e| UnidupError::db_operation("prepare referrer query", e))?;

        let rows = stmt
            .query_map(params![schema, asset_id], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, i64>(2)?,
                    r.get::<_, String>(3)?,
                ))
            })
            .map_err(|e| UnidupError::db_operation("execute referrer query", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| UnidupError::db_operation("read referrer row", e))?;

        let mut records = Vec::new();
        for (id, schema, published, data_json) in rows {
            let data: Map<String, Value> = serde_json::from_str(&data_json)
                .map_err(|e| UnidupError::target_operation("parse data of", format!("record {}", id), e))?;

            records.push(Record {
                id,
                schema,
                published: published != 0,
                data,
            });
        }

        Ok(records)
    }

    /// Persist a rewritten record and re-derive its asset dependency edges
    /// from the given gallery fields, atomically.
    pub fn persist_record(&self, record: &Record, gallery_fields: &[String]) -> Result<()> {
        let data_json = serde_json::to_string(&Value::Object(record.data.clone()))?;
        let referenced = record.referenced_assets(gallery_fields)?;

        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| UnidupError::db_operation("begin record persist transaction", e))?;

        let changed = tx
            .execute(
                "UPDATE records SET data = ?2, published = ?3 WHERE id = ?1",
                params![record.id, data_json, record.published as i64],
            )
            .map_err(|e| UnidupError::target_operation("persist", format!("record {}", record.id), e))?;

        if changed == 0 {
            return Err(UnidupError::target_operation(
                "persist",
                format!("record {}", record.id),
                "row no longer exists",
            ));
        }

        tx.execute(
            "DELETE FROM dependencies
             WHERE source_type = 'record' AND source_id = ?1 AND target_type = 'asset'",
            params![record.id],
        )
        .map_err(|e| UnidupError::db_operation("clear record dependencies", e))?;

        for asset_id in referenced {
            tx.execute(
                "INSERT OR IGNORE INTO dependencies
                 (source_type, source_id, target_type, target_id)
                 VALUES ('record', ?1, 'asset', ?2)",
                params![record.id, asset_id],
            )
            .map_err(|e| UnidupError::db_operation("insert record dependency", e))?;
        }

        tx.commit()
            .map_err(|e| UnidupError::db_operation("commit record persist transaction", e))?;

        Ok(())
    }
}
