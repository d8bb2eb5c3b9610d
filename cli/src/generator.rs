#![deny(missing_docs)]

//! # Generator Driver
//!
//! Owns everything the compiler core refuses to: discovering the description
//! tree on disk, decoding YAML/JSON into raw values, and writing the emitted
//! units back out.
//!
//! Expected layout under the spec directory:
//!
//! ```text
//! paths.yaml      — ordered path table: path template → tag file pointer
//! tags/*.yaml     — one resource document per file
//! schemas/*.yaml  — one schema document per file (stem = document name)
//! ```

use crate::error::{CliError, CliResult};
use chessgen_core::spec::ref_document_name;
use chessgen_core::{generate, DocumentSet, GeneratedOutput, PathEntry};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;
use tracing::info;
use walkdir::WalkDir;

/// Runs one full generation: read, compile, write.
pub fn run(spec_dir: &Path, out_dir: &Path) -> CliResult<()> {
    let docs = load_documents(spec_dir)?;
    let output = generate(&docs)?;
    write_output(out_dir, &output)?;
    Ok(())
}

/// Loads the description tree into an in-memory document set.
pub fn load_documents(spec_dir: &Path) -> CliResult<DocumentSet> {
    let mut docs = DocumentSet::new();

    for (name, value) in read_directory(&spec_dir.join("schemas"))? {
        docs.register_schema(&name, value)?;
    }
    for (name, value) in read_directory(&spec_dir.join("tags"))? {
        docs.register_tag(&name, value)?;
    }

    let path_table = read_path_table(&spec_dir.join("paths.yaml"))?;
    docs.set_path_table(path_table)?;

    Ok(docs)
}

/// Writes every emitted unit under the output directory.
pub fn write_output(out_dir: &Path, output: &GeneratedOutput) -> CliResult<()> {
    let schemas_dir = out_dir.join("schemas");
    fs::create_dir_all(&schemas_dir)?;

    for unit in &output.schema_units {
        fs::write(schemas_dir.join(format!("{}.ts", unit.name)), &unit.source)?;
    }
    fs::write(out_dir.join("client.ts"), &output.client.source)?;
    fs::write(out_dir.join("runtime.ts"), &output.runtime.source)?;

    info!(
        schemas = output.schema_units.len(),
        out = %out_dir.display(),
        "wrote generated units"
    );
    Ok(())
}

/// Reads every document file directly under `dir`, sorted by file name so
/// registration order (and thus output order) is stable across platforms.
fn read_directory(dir: &Path) -> CliResult<Vec<(String, JsonValue)>> {
    if !dir.is_dir() {
        return Err(CliError::General(format!(
            "Expected directory '{}'",
            dir.display()
        )));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| CliError::General(format!("Walk failed: {}", e)))?;
        let path = entry.path();
        if !is_document_file(path) {
            continue;
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                CliError::General(format!("Unusable file name '{}'", path.display()))
            })?
            .to_string();
        entries.push((name, read_document(path)?));
    }
    Ok(entries)
}

fn is_document_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml") | Some("json")
    )
}

/// Decodes one document file. YAML is a superset of JSON, so one decoder
/// covers both extensions.
fn read_document(path: &Path) -> CliResult<JsonValue> {
    let content = fs::read_to_string(path)?;
    let parsed: serde_yaml::Value = serde_yaml::from_str(&content)
        .map_err(|e| CliError::General(format!("Failed to parse '{}': {}", path.display(), e)))?;
    serde_json::to_value(parsed)
        .map_err(|e| CliError::General(format!("Failed to decode '{}': {}", path.display(), e)))
}

/// Reads the ordered path table: a mapping from path template to a tag file
/// pointer (e.g. `/api/account: account.yaml`).
fn read_path_table(path: &Path) -> CliResult<Vec<PathEntry>> {
    let raw = read_document(path)?;
    let map = raw.as_object().ok_or_else(|| {
        CliError::General(format!("Path table '{}' must be a mapping", path.display()))
    })?;

    let mut entries = Vec::with_capacity(map.len());
    for (template, pointer) in map {
        let pointer = pointer.as_str().ok_or_else(|| {
            CliError::General(format!(
                "Path '{}' must point at a tag file, found {}",
                template, pointer
            ))
        })?;
        let tag = ref_document_name(pointer).ok_or_else(|| {
            CliError::General(format!(
                "Path '{}' points at '{}', which has no document stem",
                template, pointer
            ))
        })?;
        entries.push(PathEntry {
            path: template.clone(),
            tag,
        });
    }
    Ok(entries)
}
