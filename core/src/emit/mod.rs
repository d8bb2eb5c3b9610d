#![deny(missing_docs)]

//! # Emission
//!
//! Recursive compilers from the classified IR to TypeScript source units.
//!
//! - **validators**: SchemaNode → runtime-check source.
//! - **types**: SchemaNode → static-type source.
//! - **params**: parameter/body composition into one operation input shape.
//! - **responses**: status→handler dispatch tables.
//! - **client**: per-tag method compilation and the aggregate client.
//! - **runtime**: the static runtime-support unit shipped with the output.
//!
//! Everything emitted here is deterministic: same input documents, same
//! bytes out.

pub mod client;
pub mod params;
pub mod responses;
pub mod runtime;
pub mod types;
pub mod validators;

use crate::error::{AppError, AppResult};
use crate::spec::refs::Resolver;
use std::collections::BTreeSet;

/// One emitted source unit plus its dependency metadata.
///
/// Dependencies are the direct reference names touched during emission,
/// sorted and deduplicated; renderers turn them into import lines.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedUnit {
    /// Unit name (schema document name, or a fixed name for client/runtime).
    pub name: String,
    /// Direct dependencies in sorted order.
    pub dependencies: Vec<String>,
    /// Complete TypeScript source.
    pub source: String,
}

/// Mutable state threaded through one unit's emission.
///
/// Wraps the resolver and accumulates the unit's dependency-name set.
pub struct EmitContext<'a> {
    resolver: Resolver<'a>,
    deps: BTreeSet<String>,
}

impl<'a> EmitContext<'a> {
    /// Creates a context scoped to the unit the resolver was built for.
    pub fn new(resolver: Resolver<'a>) -> Self {
        Self {
            resolver,
            deps: BTreeSet::new(),
        }
    }

    /// Resolves a reference target and records it as a dependency.
    pub fn record_ref(&mut self, target: &str) -> AppResult<()> {
        self.resolver.resolve(target)?;
        self.deps.insert(target.to_string());
        Ok(())
    }

    /// The name of the unit being emitted, for diagnostics.
    pub fn document(&self) -> &str {
        self.resolver.document()
    }

    /// Builds the unsupported-kind error for the current unit.
    pub fn unsupported(&self, kind: &str) -> AppError {
        AppError::UnsupportedKind {
            path: self.document().to_string(),
            kind: kind.to_string(),
        }
    }

    /// Consumes the context, yielding the accumulated dependency set.
    pub fn into_dependencies(self) -> BTreeSet<String> {
        self.deps
    }
}

/// Renders a TypeScript single-quoted string literal.
pub(crate) fn ts_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// Renders an object key, quoting it unless it is a plain identifier.
pub(crate) fn ts_property_key(name: &str) -> String {
    let mut chars = name.chars();
    let plain = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_' || first == '$')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        None => false,
    };
    if plain {
        name.to_string()
    } else {
        ts_string(name)
    }
}

/// Renders a `/** ... */` doc comment at the given indent, one trailing
/// newline included. Empty input renders nothing.
pub(crate) fn doc_comment(lines: &[&str], indent: usize) -> String {
    let pad = " ".repeat(indent);
    match lines {
        [] => String::new(),
        [single] => format!("{}/** {} */\n", pad, single),
        many => {
            let mut out = format!("{}/**\n", pad);
            for line in many {
                out.push_str(&format!("{} * {}\n", pad, line));
            }
            out.push_str(&format!("{} */\n", pad));
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ts_string_escapes() {
        assert_eq!(ts_string("plain"), "'plain'");
        assert_eq!(ts_string("it's"), "'it\\'s'");
        assert_eq!(ts_string("a\\b"), "'a\\\\b'");
    }

    #[test]
    fn test_ts_property_key_quotes_non_identifiers() {
        assert_eq!(ts_property_key("username"), "username");
        assert_eq!(ts_property_key("$ref"), "$ref");
        assert_eq!(ts_property_key("x-count"), "'x-count'");
        assert_eq!(ts_property_key("2fa"), "'2fa'");
    }

    #[test]
    fn test_doc_comment_single_and_multi() {
        assert_eq!(doc_comment(&["One line."], 0), "/** One line. */\n");
        assert_eq!(
            doc_comment(&["First.", "Second."], 2),
            "  /**\n   * First.\n   * Second.\n   */\n"
        );
        assert_eq!(doc_comment(&[], 0), "");
    }
}
