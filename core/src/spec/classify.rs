#![deny(missing_docs)]

//! # Schema Classifier
//!
//! Maps a raw, already-decoded schema node onto exactly one [`SchemaNode`]
//! case.
//!
//! Each kind owns an exact key-signature: an *anchor* (the keys and `type`
//! tag that identify the kind) plus the set of optional facet keys legal for
//! it. No unrecognized keys are permitted. Signatures are tried in a fixed
//! priority order and the first anchor match wins; signatures are mutually
//! exclusive, so the order only pins down diagnostics, not semantics.
//!
//! A node whose anchor matches but whose facets are malformed fails loudly
//! with the offending location; a node matching no anchor at all is a fatal
//! classification error.

use crate::error::{classification_error, AppError, AppResult};
use crate::spec::models::{
    ArrayNode, BooleanFacets, IntegerFacets, NumberFacets, ObjectNode, Property, RefNode,
    SchemaNode, StringFacets, TaggedUnionNode,
};
use crate::spec::refs::ref_document_name;
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeSet;

const REF_KEYS: &[&str] = &["$ref", "description", "deprecated"];
const NULL_KEYS: &[&str] = &["type", "description"];
const STRING_KEYS: &[&str] = &[
    "type",
    "const",
    "enum",
    "format",
    "minLength",
    "maxLength",
    "pattern",
    "description",
    "example",
];
const INTEGER_KEYS: &[&str] = &[
    "type",
    "const",
    "enum",
    "format",
    "minimum",
    "maximum",
    "description",
    "example",
];
const NUMBER_KEYS: &[&str] = &[
    "type",
    "format",
    "minimum",
    "maximum",
    "description",
    "example",
];
const BOOLEAN_KEYS: &[&str] = &["type", "const", "description", "example"];
const OBJECT_KEYS: &[&str] = &[
    "type",
    "title",
    "properties",
    "required",
    "example",
    "description",
    "additionalProperties",
];
const DICTIONARY_KEYS: &[&str] = &["type", "additionalProperties", "description"];
const ARRAY_KEYS: &[&str] = &[
    "type",
    "items",
    "example",
    "minItems",
    "maxItems",
    "description",
];
const ONE_OF_KEYS: &[&str] = &["oneOf", "description"];
const ALL_OF_KEYS: &[&str] = &["type", "allOf", "description"];
const ANY_OF_KEYS: &[&str] = &["type", "anyOf", "discriminator", "description"];
const DISCRIMINATOR_KEYS: &[&str] = &["propertyName", "mapping"];

/// Classifies a raw schema node into exactly one [`SchemaNode`].
///
/// `path` locates the node for diagnostics (document name plus pointer, e.g.
/// `Account#/properties/prefs`).
pub fn classify(path: &str, value: &JsonValue) -> AppResult<SchemaNode> {
    let map = value
        .as_object()
        .ok_or_else(|| classification_error(path, value))?;

    if let Some(node) = match_reference(path, map)? {
        return Ok(node);
    }
    if let Some(node) = match_null(map) {
        return Ok(node);
    }
    if let Some(facets) = match_string(path, map, true)? {
        return Ok(SchemaNode::NullableStr(facets));
    }
    if let Some(facets) = match_integer(path, map, true)? {
        return Ok(SchemaNode::NullableInt(facets));
    }
    if let Some(facets) = match_string(path, map, false)? {
        return Ok(SchemaNode::Str(facets));
    }
    if let Some(facets) = match_integer(path, map, false)? {
        return Ok(SchemaNode::Int(facets));
    }
    if let Some(node) = match_number(path, map)? {
        return Ok(node);
    }
    if let Some(node) = match_boolean(path, map)? {
        return Ok(node);
    }
    if let Some(node) = match_object(path, map)? {
        return Ok(node);
    }
    if let Some(node) = match_dictionary(path, map)? {
        return Ok(node);
    }
    if let Some(node) = match_array(path, map)? {
        return Ok(node);
    }
    if let Some(node) = match_one_of(path, map)? {
        return Ok(node);
    }
    if let Some(node) = match_all_of(path, map)? {
        return Ok(node);
    }
    if let Some(node) = match_tagged_any_of(path, map)? {
        return Ok(node);
    }

    Err(classification_error(path, value))
}

/// Reads the `description` key off a raw mapping, if present.
///
/// Descriptions are metadata consumed at the property or document boundary,
/// not part of the classified tree for primitives.
pub fn extract_description(value: &JsonValue) -> Option<String> {
    value
        .as_object()?
        .get("description")?
        .as_str()
        .map(str::to_string)
}

// --- Anchor predicates and builders, one per kind ---

fn match_reference(path: &str, map: &Map<String, JsonValue>) -> AppResult<Option<SchemaNode>> {
    if !map.contains_key("$ref") || !keys_within(map, REF_KEYS) {
        return Ok(None);
    }
    let raw = expect_str(path, map, "$ref")?;
    let target = ref_document_name(&raw).ok_or_else(|| {
        AppError::General(format!("Reference '{}' at {} has no document stem", raw, path))
    })?;
    Ok(Some(SchemaNode::Ref(RefNode {
        target,
        description: opt_str(map, "description"),
        deprecated: map
            .get("deprecated")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false),
    })))
}

fn match_null(map: &Map<String, JsonValue>) -> Option<SchemaNode> {
    if type_tag_is(map, "null") && keys_within(map, NULL_KEYS) {
        Some(SchemaNode::Null)
    } else {
        None
    }
}

fn match_string(
    path: &str,
    map: &Map<String, JsonValue>,
    nullable: bool,
) -> AppResult<Option<StringFacets>> {
    let anchored = if nullable {
        type_tag_is_nullable(map, "string")
    } else {
        type_tag_is(map, "string")
    };
    if !anchored || !keys_within(map, STRING_KEYS) {
        return Ok(None);
    }

    let mut facets = StringFacets::default();
    if map.contains_key("const") {
        facets.constant = Some(expect_str(path, map, "const")?);
    }
    if map.contains_key("enum") {
        facets.one_of = expect_str_list(path, map, "enum")?;
    }
    facets.format = opt_str(map, "format");
    facets.min_length = expect_opt_u64(path, map, "minLength")?;
    facets.max_length = expect_opt_u64(path, map, "maxLength")?;
    facets.pattern = opt_str(map, "pattern");
    Ok(Some(facets))
}

fn match_integer(
    path: &str,
    map: &Map<String, JsonValue>,
    nullable: bool,
) -> AppResult<Option<IntegerFacets>> {
    let anchored = if nullable {
        type_tag_is_nullable(map, "integer")
    } else {
        type_tag_is(map, "integer")
    };
    if !anchored || !keys_within(map, INTEGER_KEYS) {
        return Ok(None);
    }

    let mut facets = IntegerFacets::default();
    if map.contains_key("const") {
        facets.constant = Some(expect_i64(path, map, "const")?);
    }
    if map.contains_key("enum") {
        facets.one_of = expect_i64_list(path, map, "enum")?;
    }
    facets.format = opt_str(map, "format");
    facets.minimum = expect_opt_i64(path, map, "minimum")?;
    facets.maximum = expect_opt_i64(path, map, "maximum")?;
    Ok(Some(facets))
}

fn match_number(path: &str, map: &Map<String, JsonValue>) -> AppResult<Option<SchemaNode>> {
    if !type_tag_is(map, "number") || !keys_within(map, NUMBER_KEYS) {
        return Ok(None);
    }
    let facets = NumberFacets {
        format: opt_str(map, "format"),
        minimum: expect_opt_f64(path, map, "minimum")?,
        maximum: expect_opt_f64(path, map, "maximum")?,
    };
    Ok(Some(SchemaNode::Num(facets)))
}

fn match_boolean(path: &str, map: &Map<String, JsonValue>) -> AppResult<Option<SchemaNode>> {
    if !type_tag_is(map, "boolean") || !keys_within(map, BOOLEAN_KEYS) {
        return Ok(None);
    }
    let mut facets = BooleanFacets::default();
    if let Some(raw) = map.get("const") {
        facets.constant = Some(raw.as_bool().ok_or_else(|| {
            AppError::General(format!("Boolean 'const' at {} must be a boolean", path))
        })?);
    }
    Ok(Some(SchemaNode::Bool(facets)))
}

fn match_object(path: &str, map: &Map<String, JsonValue>) -> AppResult<Option<SchemaNode>> {
    if !map.contains_key("properties") || !keys_within(map, OBJECT_KEYS) {
        return Ok(None);
    }
    if map.contains_key("type") && !type_tag_is(map, "object") {
        return Ok(None);
    }
    // The only additionalProperties value admitted alongside `properties` is
    // the sealing marker `false`.
    let sealed = match map.get("additionalProperties") {
        None => false,
        Some(JsonValue::Bool(false)) => true,
        Some(_) => return Ok(None),
    };

    let raw_props = map
        .get("properties")
        .and_then(JsonValue::as_object)
        .ok_or_else(|| {
            AppError::General(format!("'properties' at {} must be a mapping", path))
        })?;

    let mut properties = IndexMap::new();
    for (name, raw) in raw_props {
        let child_path = format!("{}/properties/{}", path, name);
        let schema = classify(&child_path, raw)?;
        properties.insert(
            name.clone(),
            Property {
                schema,
                description: extract_description(raw),
            },
        );
    }

    let mut required = BTreeSet::new();
    if map.contains_key("required") {
        for name in expect_str_list(path, map, "required")? {
            if !properties.contains_key(&name) {
                return Err(AppError::General(format!(
                    "Required property '{}' is not declared at {}",
                    name, path
                )));
            }
            required.insert(name);
        }
    }

    Ok(Some(SchemaNode::Object(ObjectNode {
        title: opt_str(map, "title"),
        properties,
        required,
        sealed,
    })))
}

fn match_dictionary(path: &str, map: &Map<String, JsonValue>) -> AppResult<Option<SchemaNode>> {
    let Some(raw_values) = map.get("additionalProperties") else {
        return Ok(None);
    };
    if map.contains_key("properties")
        || !keys_within(map, DICTIONARY_KEYS)
        || !raw_values.is_object()
    {
        return Ok(None);
    }
    if map.contains_key("type") && !type_tag_is(map, "object") {
        return Ok(None);
    }
    let child_path = format!("{}/additionalProperties", path);
    let values = classify(&child_path, raw_values)?;
    Ok(Some(SchemaNode::Dictionary(Box::new(values))))
}

fn match_array(path: &str, map: &Map<String, JsonValue>) -> AppResult<Option<SchemaNode>> {
    if !type_tag_is(map, "array") || !keys_within(map, ARRAY_KEYS) {
        return Ok(None);
    }
    let items = match map.get("items") {
        Some(raw) => Some(Box::new(classify(&format!("{}/items", path), raw)?)),
        None => None,
    };
    Ok(Some(SchemaNode::Array(ArrayNode {
        items,
        min_items: expect_opt_u64(path, map, "minItems")?,
        max_items: expect_opt_u64(path, map, "maxItems")?,
    })))
}

fn match_one_of(path: &str, map: &Map<String, JsonValue>) -> AppResult<Option<SchemaNode>> {
    if !map.contains_key("oneOf") || !keys_within(map, ONE_OF_KEYS) {
        return Ok(None);
    }
    let members = expect_list(path, map, "oneOf")?;
    if members.is_empty() {
        return Err(AppError::General(format!(
            "'oneOf' at {} must not be empty",
            path
        )));
    }
    let mut classified = Vec::with_capacity(members.len());
    for (idx, member) in members.iter().enumerate() {
        classified.push(classify(&format!("{}/oneOf/{}", path, idx), member)?);
    }
    Ok(Some(SchemaNode::OneOf(classified)))
}

fn match_all_of(path: &str, map: &Map<String, JsonValue>) -> AppResult<Option<SchemaNode>> {
    if !map.contains_key("allOf") || !keys_within(map, ALL_OF_KEYS) {
        return Ok(None);
    }
    let members = expect_list(path, map, "allOf")?;
    if members.len() != 2 {
        return Err(AppError::General(format!(
            "'allOf' at {} must contain exactly two members, found {}",
            path,
            members.len()
        )));
    }
    let first = classify(&format!("{}/allOf/0", path), &members[0])?;
    let second = classify(&format!("{}/allOf/1", path), &members[1])?;
    Ok(Some(SchemaNode::AllOf(Box::new(first), Box::new(second))))
}

fn match_tagged_any_of(path: &str, map: &Map<String, JsonValue>) -> AppResult<Option<SchemaNode>> {
    if !map.contains_key("anyOf") || !keys_within(map, ANY_OF_KEYS) {
        return Ok(None);
    }
    let Some(raw_discriminator) = map.get("discriminator") else {
        // The kind is recognizable but carries no emission rule without a
        // discriminator; refusing here beats guessing an untagged fallback.
        return Err(AppError::UnsupportedKind {
            path: path.to_string(),
            kind: "anyOf without a discriminator".to_string(),
        });
    };

    let disc = raw_discriminator.as_object().ok_or_else(|| {
        AppError::General(format!("'discriminator' at {} must be a mapping", path))
    })?;
    if !keys_within(disc, DISCRIMINATOR_KEYS) {
        return Err(AppError::General(format!(
            "'discriminator' at {} admits only propertyName and mapping",
            path
        )));
    }
    let property = expect_str(path, disc, "propertyName")?;
    let raw_mapping = disc
        .get("mapping")
        .and_then(JsonValue::as_object)
        .ok_or_else(|| {
            AppError::General(format!(
                "'discriminator.mapping' at {} must be a mapping",
                path
            ))
        })?;

    let mut mapping = IndexMap::new();
    for (value, raw_target) in raw_mapping {
        let target_ref = raw_target.as_str().ok_or_else(|| {
            AppError::General(format!(
                "Discriminator mapping '{}' at {} must be a reference path",
                value, path
            ))
        })?;
        let target = ref_document_name(target_ref).ok_or_else(|| {
            AppError::General(format!(
                "Discriminator mapping '{}' at {} has no document stem",
                value, path
            ))
        })?;
        mapping.insert(value.clone(), target);
    }

    let members_raw = expect_list(path, map, "anyOf")?;
    let mut members = Vec::with_capacity(members_raw.len());
    for (idx, member) in members_raw.iter().enumerate() {
        let member_path = format!("{}/anyOf/{}", path, idx);
        match classify(&member_path, member)? {
            SchemaNode::Ref(r) => members.push(r),
            other => {
                return Err(AppError::General(format!(
                    "Discriminated anyOf member at {} must be a bare reference, found {}",
                    member_path,
                    other.kind_name()
                )))
            }
        }
    }

    Ok(Some(SchemaNode::TaggedAnyOf(TaggedUnionNode {
        property,
        mapping,
        members,
    })))
}

// --- Shared shallow helpers ---

fn keys_within(map: &Map<String, JsonValue>, allowed: &[&str]) -> bool {
    map.keys().all(|k| allowed.contains(&k.as_str()))
}

fn type_tag_is(map: &Map<String, JsonValue>, expected: &str) -> bool {
    map.get("type").and_then(JsonValue::as_str) == Some(expected)
}

/// True when `type` is exactly `[base, "null"]`.
fn type_tag_is_nullable(map: &Map<String, JsonValue>, base: &str) -> bool {
    let Some(list) = map.get("type").and_then(JsonValue::as_array) else {
        return false;
    };
    list.len() == 2
        && list[0].as_str() == Some(base)
        && list[1].as_str() == Some("null")
}

fn opt_str(map: &Map<String, JsonValue>, key: &str) -> Option<String> {
    map.get(key).and_then(JsonValue::as_str).map(str::to_string)
}

fn expect_str(path: &str, map: &Map<String, JsonValue>, key: &str) -> AppResult<String> {
    map.get(key)
        .and_then(JsonValue::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::General(format!("'{}' at {} must be a string", key, path)))
}

fn expect_list<'a>(
    path: &str,
    map: &'a Map<String, JsonValue>,
    key: &str,
) -> AppResult<&'a Vec<JsonValue>> {
    map.get(key)
        .and_then(JsonValue::as_array)
        .ok_or_else(|| AppError::General(format!("'{}' at {} must be a list", key, path)))
}

fn expect_str_list(path: &str, map: &Map<String, JsonValue>, key: &str) -> AppResult<Vec<String>> {
    let list = expect_list(path, map, key)?;
    list.iter()
        .map(|v| {
            v.as_str().map(str::to_string).ok_or_else(|| {
                AppError::General(format!("'{}' at {} must contain only strings", key, path))
            })
        })
        .collect()
}

fn expect_i64_list(path: &str, map: &Map<String, JsonValue>, key: &str) -> AppResult<Vec<i64>> {
    let list = expect_list(path, map, key)?;
    list.iter()
        .map(|v| {
            v.as_i64().ok_or_else(|| {
                AppError::General(format!("'{}' at {} must contain only integers", key, path))
            })
        })
        .collect()
}

fn expect_i64(path: &str, map: &Map<String, JsonValue>, key: &str) -> AppResult<i64> {
    map.get(key)
        .and_then(JsonValue::as_i64)
        .ok_or_else(|| AppError::General(format!("'{}' at {} must be an integer", key, path)))
}

fn expect_opt_u64(path: &str, map: &Map<String, JsonValue>, key: &str) -> AppResult<Option<u64>> {
    match map.get(key) {
        None => Ok(None),
        Some(v) => v.as_u64().map(Some).ok_or_else(|| {
            AppError::General(format!("'{}' at {} must be a non-negative integer", key, path))
        }),
    }
}

fn expect_opt_i64(path: &str, map: &Map<String, JsonValue>, key: &str) -> AppResult<Option<i64>> {
    match map.get(key) {
        None => Ok(None),
        Some(v) => v.as_i64().map(Some).ok_or_else(|| {
            AppError::General(format!("'{}' at {} must be an integer", key, path))
        }),
    }
}

fn expect_opt_f64(path: &str, map: &Map<String, JsonValue>, key: &str) -> AppResult<Option<f64>> {
    match map.get(key) {
        None => Ok(None),
        Some(v) => v.as_f64().map(Some).ok_or_else(|| {
            AppError::General(format!("'{}' at {} must be a number", key, path))
        }),
    }
}
