#![deny(missing_docs)]

//! # Chessgen Core
//!
//! Core library for the schema-to-code compiler: classifies a structured
//! chess REST API description into a closed schema algebra and emits a typed
//! TypeScript client (runtime validators, static types, and callable
//! operations with status-keyed response dispatch).
//!
//! Document acquisition, HTTP transport, and output writing are external
//! collaborators; everything in this crate is a pure transform over
//! already-loaded documents.

/// Shared error types.
pub mod error;

/// Emission: validators, types, composition, dispatch, client assembly.
pub mod emit;

/// Generation entry point.
pub mod generate;

/// In-memory document registry.
pub mod registry;

/// Classification and IR for the interface description.
pub mod spec;

pub use emit::EmittedUnit;
pub use error::{AppError, AppResult};
pub use generate::{generate, GeneratedOutput};
pub use registry::DocumentSet;
pub use spec::{
    classify, parse_tag_document, BodyContent, HttpMethod, OperationDescriptor, ParamLocation,
    ParameterDescriptor, PathEntry, RequestBodyDescriptor, ResponseContent, ResponseDescriptor,
    SchemaDocument, SchemaNode, TagDocument,
};
