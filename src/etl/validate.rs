//! Structural checks run on shaped records before they are written.
//!
//! The table schema lives in `schemas/osm_records.json`. Every value is text,
//! so integer and float columns are strings constrained by a numeric pattern.
use std::collections::BTreeMap;

use jsonschema::JSONSchema;
use serde_json::{json, Value};

use crate::data::ShapedRecord;
use crate::errors::{Error, Result};

const RECORD_SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/schemas/osm_records.json"));

pub trait RecordValidator {
    fn validate(&self, record: &ShapedRecord) -> Result<()>;
}

pub struct SchemaValidator {
    node: JSONSchema,
    way: JSONSchema,
}

impl SchemaValidator {
    pub fn new() -> Result<SchemaValidator> {
        let document: Value = serde_json::from_str(RECORD_SCHEMA)?;
        Ok(SchemaValidator {
            node: Self::compile(&document, "node")?,
            way: Self::compile(&document, "way")?,
        })
    }

    /// Compiles the sub-schema `kind` together with the shared definitions.
    fn compile(document: &Value, kind: &str) -> Result<JSONSchema> {
        let mut schema = document.clone();
        schema["allOf"] = json!([{ "$ref": format!("#/{kind}") }]);
        JSONSchema::compile(&schema).map_err(|err| Error::InvalidSchema {
            message: format!("{kind}: {err}"),
        })
    }

    /// `/node_tags/3/id` becomes `node_tags.id`.
    fn field_name(instance_path: &str) -> String {
        instance_path
            .split('/')
            .filter(|chunk| !chunk.is_empty() && !chunk.chars().all(|c| c.is_ascii_digit()))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl RecordValidator for SchemaValidator {
    fn validate(&self, record: &ShapedRecord) -> Result<()> {
        let (element, schema) = match record {
            ShapedRecord::Point { .. } => ("node", &self.node),
            ShapedRecord::Way { .. } => ("way", &self.way),
        };
        let instance = serde_json::to_value(record)?;

        // One message per field, in field name order.
        let mut failures: BTreeMap<String, String> = BTreeMap::new();
        if let Err(errors) = schema.validate(&instance) {
            for error in errors {
                let field = Self::field_name(&error.instance_path.to_string());
                failures.entry(field).or_insert_with(|| error.to_string());
            }
        }
        if failures.is_empty() {
            return Ok(());
        }

        let lines: Vec<String> = failures
            .iter()
            .map(|(field, reason)| format!("{field}: {reason}"))
            .collect();
        Err(Error::SchemaValidation {
            message: format!(
                "Element of type '{element}' has the following errors:\n{}",
                lines.join("\n")
            ),
            fields: failures.into_keys().collect(),
        })
    }
}
