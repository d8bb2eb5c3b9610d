#![deny(missing_docs)]

//! # Generation Entry Point
//!
//! The compiler core as a pure function: already-loaded documents in,
//! emitted-unit descriptors out. Discovery, reading, and writing belong to
//! the CLI driver, which keeps everything here testable without storage
//! access.
//!
//! Independent documents are compiled in parallel; output ordering always
//! follows registration order (schema units) and path-table declaration
//! order (client methods), never completion order. Any compile-time error
//! aborts the whole run.

use crate::emit::client::{compile_tag, render_client_unit, CompiledTag};
use crate::emit::runtime::runtime_unit;
use crate::emit::types::emit_type;
use crate::emit::validators::emit_validator;
use crate::emit::{doc_comment, EmitContext, EmittedUnit};
use crate::error::{AppError, AppResult};
use crate::registry::DocumentSet;
use crate::spec::classify::{classify, extract_description};
use crate::spec::models::SchemaDocument;
use crate::spec::refs::Resolver;
use crate::spec::tags::parse_tag_document;
use rayon::prelude::*;
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Everything one generation run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedOutput {
    /// One unit per schema document, registration order.
    pub schema_units: Vec<EmittedUnit>,
    /// Classified schema documents with transitive reference sets.
    pub documents: Vec<SchemaDocument>,
    /// The aggregate client unit.
    pub client: EmittedUnit,
    /// The static runtime-support unit.
    pub runtime: EmittedUnit,
}

struct CompiledSchema {
    document: SchemaDocument,
    unit: EmittedUnit,
}

/// Runs the whole compiler over `docs`.
pub fn generate(docs: &DocumentSet) -> AppResult<GeneratedOutput> {
    let known = docs.schema_names();

    info!(
        schemas = docs.schemas().len(),
        paths = docs.path_table().len(),
        "starting generation run"
    );

    let schema_entries: Vec<(&String, &JsonValue)> = docs.schemas().iter().collect();
    let compiled: Vec<AppResult<CompiledSchema>> = schema_entries
        .into_par_iter()
        .map(|(name, raw)| compile_schema(name, raw, &known))
        .collect();

    let mut documents = Vec::with_capacity(compiled.len());
    let mut schema_units = Vec::with_capacity(compiled.len());
    let mut direct: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for result in compiled {
        let schema = result?;
        direct.insert(
            schema.document.name.clone(),
            schema.document.references.clone(),
        );
        documents.push(schema.document);
        schema_units.push(schema.unit);
    }

    // Direct sets become transitive closures once every document is known.
    for document in &mut documents {
        document.references = transitive_closure(&document.name, &direct);
    }

    // Tag compilation runs in parallel too; rayon's indexed collect keeps
    // path-table declaration order regardless of completion order.
    let tags: Vec<AppResult<CompiledTag>> = docs
        .path_table()
        .par_iter()
        .map(|entry| {
            let raw = docs.tag(&entry.tag).ok_or_else(|| AppError::RefResolution {
                reference: entry.tag.clone(),
                document: String::from("path table"),
            })?;
            let tag = parse_tag_document(&entry.tag, &entry.path, raw)?;
            debug!(
                tag = %tag.name,
                path = %entry.path,
                operations = tag.operations.len(),
                "compiled tag document"
            );
            compile_tag(&entry.path, &tag, &known)
        })
        .collect();
    let tags = tags.into_iter().collect::<AppResult<Vec<_>>>()?;

    let client = render_client_unit(&tags);

    info!(units = schema_units.len() + 2, "generation complete");

    Ok(GeneratedOutput {
        schema_units,
        documents,
        client,
        runtime: runtime_unit(),
    })
}

fn compile_schema(
    name: &str,
    raw: &JsonValue,
    known: &BTreeSet<String>,
) -> AppResult<CompiledSchema> {
    let root = classify(name, raw)?;
    let description = extract_description(raw);

    let mut ctx = EmitContext::new(Resolver::new(known, name));
    let validator = emit_validator(&root, &mut ctx)?;
    let type_source = emit_type(&root, 0, &mut ctx)?;
    let references = ctx.into_dependencies();

    let unit = render_schema_unit(
        name,
        description.as_deref(),
        &references,
        &validator,
        &type_source,
    );

    Ok(CompiledSchema {
        document: SchemaDocument {
            name: name.to_string(),
            root,
            description,
            references,
        },
        unit,
    })
}

/// Renders one schema unit: runtime import, sorted sibling imports, the
/// exported validator value, and its derived static type.
fn render_schema_unit(
    name: &str,
    description: Option<&str>,
    references: &BTreeSet<String>,
    validator: &str,
    type_source: &str,
) -> EmittedUnit {
    let imports: Vec<String> = references
        .iter()
        .filter(|dep| dep.as_str() != name)
        .cloned()
        .collect();

    let mut source = String::from("import { v } from '../runtime';\n");
    for dep in &imports {
        source.push_str(&format!("import {{ {} }} from './{}';\n", dep, dep));
    }
    source.push('\n');
    if let Some(description) = description {
        source.push_str(&doc_comment(&[description], 0));
    }
    source.push_str(&format!("export const {} = {};\n\n", name, validator));
    source.push_str(&format!("export type {} = {};\n", name, type_source));

    EmittedUnit {
        name: name.to_string(),
        dependencies: imports,
        source,
    }
}

fn transitive_closure(
    name: &str,
    direct: &BTreeMap<String, BTreeSet<String>>,
) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    let mut queue: Vec<String> = direct
        .get(name)
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default();
    while let Some(next) = queue.pop() {
        if seen.insert(next.clone()) {
            if let Some(more) = direct.get(&next) {
                queue.extend(more.iter().cloned());
            }
        }
    }
    seen.remove(name);
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_render_schema_unit_skips_self_import() {
        let mut refs = BTreeSet::new();
        refs.insert(String::from("Node"));
        refs.insert(String::from("Leaf"));
        let unit = render_schema_unit("Node", None, &refs, "v.obj({})", "{}");
        assert!(unit.source.contains("import { Leaf } from './Leaf';"));
        assert!(!unit.source.contains("from './Node'"));
        assert_eq!(unit.dependencies, vec![String::from("Leaf")]);
    }

    #[test]
    fn test_transitive_closure_excludes_self() {
        let mut direct = BTreeMap::new();
        direct.insert(
            String::from("A"),
            [String::from("B")].into_iter().collect::<BTreeSet<_>>(),
        );
        direct.insert(
            String::from("B"),
            [String::from("C")].into_iter().collect::<BTreeSet<_>>(),
        );
        direct.insert(
            String::from("C"),
            [String::from("A")].into_iter().collect::<BTreeSet<_>>(),
        );

        let closure = transitive_closure("A", &direct);
        let names: Vec<String> = closure.into_iter().collect();
        assert_eq!(names, vec![String::from("B"), String::from("C")]);
    }

    #[test]
    fn test_generate_fails_fast_on_unknown_tag_pointer() {
        let mut docs = DocumentSet::new();
        docs.set_path_table(vec![crate::spec::models::PathEntry {
            path: String::from("/api/account"),
            tag: String::from("missing"),
        }])
        .unwrap();

        let err = generate(&docs).unwrap_err();
        assert!(matches!(err, AppError::RefResolution { .. }));
    }

    #[test]
    fn test_generate_minimal_schema_unit() {
        let mut docs = DocumentSet::new();
        docs.register_schema(
            "Ok",
            json!({
                "type": "object",
                "description": "Generic success response.",
                "properties": { "ok": { "type": "boolean" } },
                "required": ["ok"],
                "additionalProperties": false
            }),
        )
        .unwrap();

        let output = generate(&docs).unwrap();
        assert_eq!(output.schema_units.len(), 1);
        let expected = concat!(
            "import { v } from '../runtime';\n",
            "\n",
            "/** Generic success response. */\n",
            "export const Ok = v.sealed({ ok: v.bool() });\n",
            "\n",
            "export type Ok = { ok: boolean };\n"
        );
        assert_eq!(output.schema_units[0].source, expected);
        assert_eq!(output.documents[0].references, BTreeSet::new());
    }
}
