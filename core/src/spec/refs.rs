#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Shared helpers for mapping `$ref` paths to schema document identifiers.
//!
//! References are file-relative (e.g. `../../schemas/Ok.yaml`); the document
//! identifier is the file stem. No storage access is performed here: the
//! resolver only validates identifiers against the set of registered names.

use crate::error::{AppError, AppResult};
use std::collections::BTreeSet;

/// Extracts the schema document identifier from a `$ref` path.
///
/// Strips any fragment, takes the final path segment, and drops the file
/// extension: `../../schemas/Ok.yaml` → `Ok`.
///
/// Returns `None` for refs with no usable stem (empty, directory-only).
pub fn ref_document_name(ref_str: &str) -> Option<String> {
    let without_fragment = ref_str.split('#').next().unwrap_or("");
    let file = without_fragment.rsplit('/').next().unwrap_or("");
    let stem = file.split('.').next().unwrap_or("");
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

/// Validates reference targets against the set of registered document names.
///
/// One resolver exists per compiled unit; the unit's dependency set is
/// accumulated separately by the emitters.
pub struct Resolver<'a> {
    known: &'a BTreeSet<String>,
    /// The unit currently being compiled, for error reporting.
    document: &'a str,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver scoped to `document` over the known-name set.
    pub fn new(known: &'a BTreeSet<String>, document: &'a str) -> Self {
        Self { known, document }
    }

    /// Returns the target identifier if it names a registered document.
    pub fn resolve(&self, target: &str) -> AppResult<()> {
        if self.known.contains(target) {
            Ok(())
        } else {
            Err(AppError::RefResolution {
                reference: target.to_string(),
                document: self.document.to_string(),
            })
        }
    }

    /// The name of the unit this resolver is scoped to.
    pub fn document(&self) -> &str {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_document_name_relative_path() {
        assert_eq!(
            ref_document_name("../../schemas/Ok.yaml").as_deref(),
            Some("Ok")
        );
        assert_eq!(ref_document_name("./GameJson.yaml").as_deref(), Some("GameJson"));
        assert_eq!(ref_document_name("Clock.json").as_deref(), Some("Clock"));
    }

    #[test]
    fn test_ref_document_name_strips_fragment() {
        assert_eq!(
            ref_document_name("../../schemas/Ok.yaml#/whatever").as_deref(),
            Some("Ok")
        );
    }

    #[test]
    fn test_ref_document_name_rejects_empty() {
        assert!(ref_document_name("").is_none());
        assert!(ref_document_name("schemas/").is_none());
        assert!(ref_document_name("#/only/fragment").is_none());
    }

    #[test]
    fn test_resolver_accepts_known_and_rejects_unknown() {
        let known: BTreeSet<String> = ["Ok".to_string(), "Clock".to_string()].into();
        let resolver = Resolver::new(&known, "Account");

        assert!(resolver.resolve("Ok").is_ok());

        let err = resolver.resolve("Missing").unwrap_err();
        let msg = format!("{}", err);
        assert!(msg.contains("Missing"));
        assert!(msg.contains("Account"));
    }
}
