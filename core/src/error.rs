#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// No schema kind signature matched the raw node. Fatal; aborts the run.
    #[from(ignore)]
    #[display("Classification Error at {path}: no schema kind matches {node}")]
    Classification {
        /// Location of the offending node (document name plus pointer).
        path: String,
        /// Compact rendering of the raw node.
        node: String,
    },

    /// The node classified, but no emission rule exists for it. Fatal.
    #[from(ignore)]
    #[display("Unsupported schema kind at {path}: {kind}")]
    UnsupportedKind {
        /// Location of the offending node.
        path: String,
        /// Human-readable kind description.
        kind: String,
    },

    /// A reference names a document that is not registered. Fatal.
    #[from(ignore)]
    #[display("Unresolved reference '{reference}' in '{document}'")]
    RefResolution {
        /// The raw reference string.
        reference: String,
        /// The document containing the reference.
        document: String,
    },

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

/// Builds a `Classification` error from a location and the raw node.
pub(crate) fn classification_error(path: &str, node: &serde_json::Value) -> AppError {
    let mut rendered = node.to_string();
    if rendered.len() > 160 {
        rendered.truncate(160);
        rendered.push_str("...");
    }
    AppError::Classification {
        path: path.to_string(),
        node: rendered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_classification_error_truncates_long_nodes() {
        let node = serde_json::json!({ "key": "x".repeat(300) });
        let err = classification_error("Doc#/properties/a", &node);
        let msg = format!("{}", err);
        assert!(msg.contains("Doc#/properties/a"));
        assert!(msg.contains("..."));
    }

    #[test]
    fn test_ref_resolution_display() {
        let err = AppError::RefResolution {
            reference: "../../schemas/Missing.yaml".into(),
            document: "Account".into(),
        };
        assert_eq!(
            format!("{}", err),
            "Unresolved reference '../../schemas/Missing.yaml' in 'Account'"
        );
    }
}
