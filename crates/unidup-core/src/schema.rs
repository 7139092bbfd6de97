//! Record schema definitions
//!
//! Schemas are registered in the `schemas` table as a name plus a list of
//! field definitions. The dedup engine only cares about fields with the
//! multi-reference gallery capability.

use serde::{Deserialize, Serialize};

/// Field type marking a multi-valued asset reference field
pub const GALLERY_FIELD_TYPE: &str = "asset_gallery";

/// One field of a registered schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: String,
}

impl FieldDefinition {
    pub fn is_gallery(&self) -> bool {
        self.field_type == GALLERY_FIELD_TYPE
    }
}

/// A schema that carries at least one gallery field, as seen by the
/// reference rewriter. Built once per run from the schema registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub name: String,
    pub gallery_fields: Vec<String>,
}
