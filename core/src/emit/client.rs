#![deny(missing_docs)]

//! # Client Compilation
//!
//! Compiles one tag document's operations into generated client methods, and
//! assembles the aggregate client unit.
//!
//! Methods are emitted in the declaration order of their method keys; the
//! aggregate client concatenates methods across tag documents in path-table
//! order. A tag-level base-URL override and shared path parameters are
//! threaded into every sibling operation before its source is emitted.

use crate::emit::params::compose;
use crate::emit::responses::{compile_dispatch, response_type};
use crate::emit::{doc_comment, ts_string, EmitContext, EmittedUnit};
use crate::error::AppResult;
use crate::spec::models::{OperationDescriptor, TagDocument};
use crate::spec::refs::Resolver;
use std::collections::BTreeSet;

/// One generated client method.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledMethod {
    /// The method name (the operation id).
    pub name: String,
    /// Full method source, indented for the client object literal.
    pub source: String,
}

/// All methods of one tag document plus the references they touched.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTag {
    /// Methods in declaration order.
    pub methods: Vec<CompiledMethod>,
    /// Union of every method's dependency set.
    pub dependencies: BTreeSet<String>,
}

/// Compiles every operation of `tag`, bound to `path`, in declaration order.
pub fn compile_tag(
    path: &str,
    tag: &TagDocument,
    known: &BTreeSet<String>,
) -> AppResult<CompiledTag> {
    let mut ctx = EmitContext::new(Resolver::new(known, &tag.name));
    let mut methods = Vec::with_capacity(tag.operations.len());
    for operation in &tag.operations {
        methods.push(compile_method(path, tag, operation, &mut ctx)?);
    }
    Ok(CompiledTag {
        methods,
        dependencies: ctx.into_dependencies(),
    })
}

fn compile_method(
    path: &str,
    tag: &TagDocument,
    operation: &OperationDescriptor,
    ctx: &mut EmitContext<'_>,
) -> AppResult<CompiledMethod> {
    let composed = compose(
        path,
        &operation.parameters,
        &tag.shared_parameters,
        operation.body.as_ref(),
        2,
        ctx,
    )?;
    let dispatch = compile_dispatch(&operation.responses, ctx)?;
    let returns = response_type(&operation.responses, ctx)?;

    let mut request = vec![
        format!("method: {}", ts_string(operation.method.as_str())),
        format!("path: {}", composed.path_expr),
    ];
    if !composed.query_names.is_empty() {
        let forwards: Vec<String> = composed
            .query_names
            .iter()
            .map(|name| format!("{}: params.{}", name, name))
            .collect();
        request.push(format!("query: {{ {} }}", forwards.join(", ")));
    }
    if let Some(body) = &operation.body {
        request.push(String::from("body: params.body"));
        request.push(format!("bodyFormat: {}", ts_string(body.content.as_str())));
    }
    if let Some(server) = &tag.server {
        request.push(format!("baseUrl: {}", ts_string(server)));
    }
    if operation.anonymous {
        request.push(String::from("anonymous: true"));
    }

    let mut source = String::new();
    let mut doc_lines: Vec<&str> = Vec::new();
    if let Some(description) = &operation.description {
        doc_lines.push(description);
    }
    if operation.deprecated {
        doc_lines.push("@deprecated");
    }
    source.push_str(&doc_comment(&doc_lines, 2));

    let signature = match &composed.input_type {
        Some(input) => format!("  {}(params: {}): Promise<{}> {{\n", operation.id, input, returns),
        None => format!("  {}(): Promise<{}> {{\n", operation.id, returns),
    };
    source.push_str(&signature);
    source.push_str(&format!(
        "    return http.request({{ {} }}, {});\n",
        request.join(", "),
        dispatch
    ));
    source.push_str("  },");

    Ok(CompiledMethod {
        name: operation.id.clone(),
        source,
    })
}

/// Assembles the aggregate client unit from per-tag compilations given in
/// path-table order.
pub fn render_client_unit(tags: &[CompiledTag]) -> EmittedUnit {
    let mut dependencies = BTreeSet::new();
    for tag in tags {
        dependencies.extend(tag.dependencies.iter().cloned());
    }

    let mut source = String::new();
    source.push_str(
        "import { v, json, ndjson, pgn, mixed, none, Transport } from './runtime';\n",
    );
    for dep in &dependencies {
        source.push_str(&format!("import {{ {} }} from './schemas/{}';\n", dep, dep));
    }
    source.push('\n');
    source.push_str("/** Callable surface over every operation of the API. */\n");
    source.push_str("export function createClient(http: Transport) {\n");
    source.push_str("  return {\n");
    for tag in tags {
        for method in &tag.methods {
            // Method sources are indented for the object literal already.
            for line in method.source.lines() {
                source.push_str("  ");
                source.push_str(line);
                source.push('\n');
            }
        }
    }
    source.push_str("  };\n");
    source.push_str("}\n");

    EmittedUnit {
        name: String::from("client"),
        dependencies: dependencies.into_iter().collect(),
        source,
    }
}
