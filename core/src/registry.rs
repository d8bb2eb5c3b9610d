#![deny(missing_docs)]

//! # Document Registry
//!
//! Stores externally supplied, already-decoded documents for one generation
//! run. No storage access is performed here: the CLI (or a test) loads raw
//! values and registers them, keeping the compiler core pure.

use crate::error::{AppError, AppResult};
use crate::spec::models::PathEntry;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;

/// All documents belonging to one generation run.
///
/// Registration order is preserved: schema units are emitted in registration
/// order, and the path table's declaration order drives client method order.
#[derive(Debug, Default)]
pub struct DocumentSet {
    path_table: Vec<PathEntry>,
    tags: IndexMap<String, JsonValue>,
    schemas: IndexMap<String, JsonValue>,
}

impl DocumentSet {
    /// Creates an empty document set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema document under its identifier (the file stem).
    pub fn register_schema(&mut self, name: &str, raw: JsonValue) -> AppResult<()> {
        if self.schemas.contains_key(name) {
            return Err(AppError::General(format!(
                "Schema document '{}' registered twice",
                name
            )));
        }
        self.schemas.insert(name.to_string(), raw);
        Ok(())
    }

    /// Registers a tag document under its identifier (the file stem).
    pub fn register_tag(&mut self, name: &str, raw: JsonValue) -> AppResult<()> {
        if self.tags.contains_key(name) {
            return Err(AppError::General(format!(
                "Tag document '{}' registered twice",
                name
            )));
        }
        self.tags.insert(name.to_string(), raw);
        Ok(())
    }

    /// Installs the top-level path table. Paths must be unique.
    pub fn set_path_table(&mut self, entries: Vec<PathEntry>) -> AppResult<()> {
        let mut seen = BTreeSet::new();
        for entry in &entries {
            if !seen.insert(entry.path.as_str()) {
                return Err(AppError::General(format!(
                    "Path '{}' appears twice in the path table",
                    entry.path
                )));
            }
        }
        self.path_table = entries;
        Ok(())
    }

    /// The set of registered schema document names.
    pub fn schema_names(&self) -> BTreeSet<String> {
        self.schemas.keys().cloned().collect()
    }

    /// Registered schema documents in registration order.
    pub fn schemas(&self) -> &IndexMap<String, JsonValue> {
        &self.schemas
    }

    /// Looks up a registered tag document.
    pub fn tag(&self, name: &str) -> Option<&JsonValue> {
        self.tags.get(name)
    }

    /// The top-level path table in declaration order.
    pub fn path_table(&self) -> &[PathEntry] {
        &self.path_table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_schema_rejects_collision() {
        let mut docs = DocumentSet::new();
        docs.register_schema("Ok", json!({ "type": "boolean" })).unwrap();
        let err = docs
            .register_schema("Ok", json!({ "type": "boolean" }))
            .unwrap_err();
        assert!(format!("{}", err).contains("registered twice"));
    }

    #[test]
    fn test_path_table_rejects_duplicate_paths() {
        let mut docs = DocumentSet::new();
        let err = docs
            .set_path_table(vec![
                PathEntry {
                    path: "/api/account".into(),
                    tag: "account".into(),
                },
                PathEntry {
                    path: "/api/account".into(),
                    tag: "account2".into(),
                },
            ])
            .unwrap_err();
        assert!(format!("{}", err).contains("appears twice"));
    }

    #[test]
    fn test_schema_names_are_sorted() {
        let mut docs = DocumentSet::new();
        docs.register_schema("Zebra", json!({ "type": "string" })).unwrap();
        docs.register_schema("Apple", json!({ "type": "string" })).unwrap();
        let names: Vec<String> = docs.schema_names().into_iter().collect();
        assert_eq!(names, ["Apple", "Zebra"]);
    }
}
