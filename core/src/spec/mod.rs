#![deny(missing_docs)]

//! # Interface Description Parsing
//!
//! - **models**: Intermediate Representation definitions.
//! - **classify**: raw schema node → tagged [`models::SchemaNode`] variant.
//! - **refs**: `$ref` path → schema document identifier.
//! - **shims**: serde-facing structs for raw operation documents.
//! - **tags**: raw resource document → [`models::TagDocument`].

pub mod classify;
pub mod models;
pub mod refs;
pub mod shims;
pub mod tags;

pub use classify::classify;
pub use models::{
    BodyContent, HttpMethod, OperationDescriptor, ParamLocation, ParameterDescriptor, PathEntry,
    RequestBodyDescriptor, ResponseContent, ResponseDescriptor, SchemaDocument, SchemaNode,
    TagDocument,
};
pub use refs::{ref_document_name, Resolver};
pub use tags::parse_tag_document;
