#![deny(missing_docs)]

//! # Interface Models
//!
//! Definition of Intermediate Representation (IR) structures for the parsed
//! API description.
//!
//! These structs transport classified data from the raw documents into the
//! emitters. They are built once per generation run and never mutated.

use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Constraint facets legal on a string schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StringFacets {
    /// `const`: the only admissible value.
    pub constant: Option<String>,
    /// `enum`: closed set of admissible values, declaration order.
    pub one_of: Vec<String>,
    /// `format`: semantic format hint (e.g. "uuid", "date-time").
    pub format: Option<String>,
    /// `minLength`.
    pub min_length: Option<u64>,
    /// `maxLength`.
    pub max_length: Option<u64>,
    /// `pattern`: regular expression the value must match.
    pub pattern: Option<String>,
}

/// Constraint facets legal on an integer schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntegerFacets {
    /// `const`.
    pub constant: Option<i64>,
    /// `enum`, declaration order.
    pub one_of: Vec<i64>,
    /// `format` (e.g. "int64").
    pub format: Option<String>,
    /// `minimum`.
    pub minimum: Option<i64>,
    /// `maximum`.
    pub maximum: Option<i64>,
}

/// Constraint facets legal on a number schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumberFacets {
    /// `format` (e.g. "double").
    pub format: Option<String>,
    /// `minimum`.
    pub minimum: Option<f64>,
    /// `maximum`.
    pub maximum: Option<f64>,
}

/// Constraint facets legal on a boolean schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BooleanFacets {
    /// `const`.
    pub constant: Option<bool>,
}

/// A reference to another schema document.
#[derive(Debug, Clone, PartialEq)]
pub struct RefNode {
    /// Target document identifier (the file stem of the `$ref` path).
    pub target: String,
    /// Optional description attached alongside the reference.
    pub description: Option<String>,
    /// Whether the referenced usage is marked deprecated.
    pub deprecated: bool,
}

/// One named property of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// The property's schema.
    pub schema: SchemaNode,
    /// Description carried onto the emitted field.
    pub description: Option<String>,
}

/// A structural object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    /// Optional `title`.
    pub title: Option<String>,
    /// Properties in declaration order.
    pub properties: IndexMap<String, Property>,
    /// Names of required properties. Always a subset of `properties`.
    pub required: BTreeSet<String>,
    /// `additionalProperties: false` — no undeclared keys admitted.
    pub sealed: bool,
}

/// An array schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    /// Element schema. Absent items have no emission rule.
    pub items: Option<Box<SchemaNode>>,
    /// `minItems`.
    pub min_items: Option<u64>,
    /// `maxItems`.
    pub max_items: Option<u64>,
}

/// A discriminated union: reference members selected by a tag property.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedUnionNode {
    /// The discriminator property name.
    pub property: String,
    /// Discriminator value → target document identifier, declaration order.
    pub mapping: IndexMap<String, String>,
    /// Member references in declaration order.
    pub members: Vec<RefNode>,
}

/// Closed algebra of schema kinds.
///
/// Every raw node classifies into exactly one case; each case carries only
/// the fields legal for that kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// `$ref` to another schema document.
    Ref(RefNode),
    /// `type: "null"`. Only meaningful as an `allOf` member.
    Null,
    /// `type: "string"`.
    Str(StringFacets),
    /// `type: "integer"`.
    Int(IntegerFacets),
    /// `type: "number"`.
    Num(NumberFacets),
    /// `type: "boolean"`.
    Bool(BooleanFacets),
    /// `type: ["string", "null"]`.
    NullableStr(StringFacets),
    /// `type: ["integer", "null"]`.
    NullableInt(IntegerFacets),
    /// `properties`-bearing structural object.
    Object(ObjectNode),
    /// `additionalProperties`-only string-keyed map.
    Dictionary(Box<SchemaNode>),
    /// `type: "array"`.
    Array(ArrayNode),
    /// `oneOf`: untagged alternatives.
    OneOf(Vec<SchemaNode>),
    /// `allOf`: intersection of exactly two members, order-significant.
    AllOf(Box<SchemaNode>, Box<SchemaNode>),
    /// `anyOf` with a discriminator: tagged union of references.
    TaggedAnyOf(TaggedUnionNode),
}

impl SchemaNode {
    /// Short kind name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SchemaNode::Ref(_) => "reference",
            SchemaNode::Null => "null",
            SchemaNode::Str(_) => "string",
            SchemaNode::Int(_) => "integer",
            SchemaNode::Num(_) => "number",
            SchemaNode::Bool(_) => "boolean",
            SchemaNode::NullableStr(_) => "nullable-string",
            SchemaNode::NullableInt(_) => "nullable-integer",
            SchemaNode::Object(_) => "object",
            SchemaNode::Dictionary(_) => "dictionary",
            SchemaNode::Array(_) => "array",
            SchemaNode::OneOf(_) => "oneOf",
            SchemaNode::AllOf(_, _) => "allOf",
            SchemaNode::TaggedAnyOf(_) => "discriminated anyOf",
        }
    }
}

/// A named, immutable schema tree plus its transitive reference set.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    /// Document identifier (the file stem).
    pub name: String,
    /// Classified schema tree.
    pub root: SchemaNode,
    /// Top-level description, rendered as the emitted unit's doc comment.
    pub description: Option<String>,
    /// Names of every document transitively reachable through references.
    pub references: BTreeSet<String>,
}

/// The source location of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    /// URL path parameter (e.g. `/api/user/{username}`).
    Path,
    /// URL query parameter (e.g. `?max=10`).
    Query,
}

/// Represents a parameter of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    /// Parameter name in the source.
    pub name: String,
    /// Location.
    pub location: ParamLocation,
    /// Whether the parameter is mandatory. Path parameters always are.
    pub required: bool,
    /// Classified value schema.
    pub schema: SchemaNode,
    /// Description carried onto the composed input field.
    pub description: Option<String>,
}

/// Supported request body content variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyContent {
    /// application/json
    Json,
    /// text/plain
    PlainText,
    /// application/x-www-form-urlencoded
    Form,
}

impl BodyContent {
    /// The wire marker passed to the transport.
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyContent::Json => "json",
            BodyContent::PlainText => "text",
            BodyContent::Form => "form",
        }
    }
}

/// Definition of a request body type and format.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBodyDescriptor {
    /// The content variant. At most one per operation.
    pub content: BodyContent,
    /// Classified body schema.
    pub schema: SchemaNode,
}

/// Supported response content variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseContent {
    /// application/json — decoded and validated.
    Json,
    /// application/x-ndjson — decoded per line and validated.
    Ndjson,
    /// application/x-chess-pgn — classified only, never schema-checked.
    Pgn,
    /// More than one media type — classified only.
    Mixed,
    /// Empty body.
    NoContent,
}

/// Represents one declared response of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDescriptor {
    /// Numeric HTTP status. Unique per operation.
    pub status: u16,
    /// The content variant.
    pub content: ResponseContent,
    /// Schema for validated variants; `None` for marker-only variants.
    pub schema: Option<SchemaNode>,
}

/// HTTP methods recognized in tag documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// HEAD
    Head,
    /// DELETE
    Delete,
    /// PUT
    Put,
}

impl HttpMethod {
    /// The lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Head => "head",
            HttpMethod::Delete => "delete",
            HttpMethod::Put => "put",
        }
    }

    /// Parses a tag-document key into a method, if it names one.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "head" => Some(HttpMethod::Head),
            "delete" => Some(HttpMethod::Delete),
            "put" => Some(HttpMethod::Put),
            _ => None,
        }
    }
}

/// Represents one parsed API operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescriptor {
    /// Operation identifier; becomes the generated method name.
    pub id: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// The operation's own parameters.
    pub parameters: Vec<ParameterDescriptor>,
    /// Request body definition (if any).
    pub body: Option<RequestBodyDescriptor>,
    /// Declared responses, declaration order, unique statuses.
    pub responses: Vec<ResponseDescriptor>,
    /// `security: []` — no authorization header is attached.
    pub anonymous: bool,
    /// Whether this operation is deprecated.
    pub deprecated: bool,
    /// Description rendered as the generated method's doc comment.
    pub description: Option<String>,
}

/// Operations for one resource path.
#[derive(Debug, Clone, PartialEq)]
pub struct TagDocument {
    /// Tag name (the file stem of the document).
    pub name: String,
    /// Operations in declaration order of their method keys.
    pub operations: Vec<OperationDescriptor>,
    /// Path parameters reused by every sibling method.
    pub shared_parameters: Vec<ParameterDescriptor>,
    /// Base-URL override for operations hosted off the default server.
    pub server: Option<String>,
}

/// One entry of the top-level path table.
#[derive(Debug, Clone, PartialEq)]
pub struct PathEntry {
    /// Literal path template (e.g. "/api/user/{username}/note").
    pub path: String,
    /// Pointer identifying the bound tag document (file stem).
    pub tag: String,
}
