#![deny(missing_docs)]

//! # Document Shims
//!
//! Serde-facing structs for the raw operation documents. Shims stay as close
//! to the wire shape as possible; classification into the IR happens in
//! [`crate::spec::tags`].
//!
//! All shims deny unknown fields so malformed documents fail loudly instead
//! of silently dropping data.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// A raw operation parameter.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShimParameter {
    /// Parameter name in the source.
    pub name: String,
    /// Location of the parameter ("path" or "query").
    #[serde(rename = "in")]
    pub location: String,
    /// Whether the parameter is required.
    #[serde(default)]
    pub required: bool,
    /// Raw, unclassified value schema.
    pub schema: JsonValue,
    /// A brief description of the parameter.
    #[serde(default)]
    pub description: Option<String>,
}

/// A raw request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShimBody {
    /// Content variant marker ("json", "text" or "form").
    pub content: String,
    /// Raw, unclassified body schema.
    pub schema: JsonValue,
}

/// A raw response entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShimResponse {
    /// Content variant marker; absent means an empty body.
    #[serde(default)]
    pub content: Option<String>,
    /// Raw, unclassified body schema (validated variants only).
    #[serde(default)]
    pub schema: Option<JsonValue>,
}

/// A raw operation document under one method key of a tag document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShimOperation {
    /// Operation identifier; derived from method + path when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// The operation's own parameters.
    #[serde(default)]
    pub parameters: Vec<ShimParameter>,
    /// Request body definition.
    #[serde(default)]
    pub body: Option<ShimBody>,
    /// Status-keyed responses, declaration order preserved.
    pub responses: IndexMap<String, ShimResponse>,
    /// Security requirements; an explicit empty list marks the call anonymous.
    #[serde(default)]
    pub security: Option<Vec<JsonValue>>,
    /// Whether this operation is deprecated.
    #[serde(default)]
    pub deprecated: bool,
    /// Description rendered onto the generated method.
    #[serde(default)]
    pub description: Option<String>,
}
