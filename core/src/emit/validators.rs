#![deny(missing_docs)]

//! # Validator Emission
//!
//! Recursive mapping from a classified [`SchemaNode`] to runtime-check
//! source over the `v` combinator namespace of the runtime unit.
//!
//! Primitives chain every declared constraint in a fixed order (const, enum,
//! format, min, max, pattern) so output is deterministic. References emit the
//! target document's identifier verbatim and record it in the context's
//! dependency set.

use crate::emit::{ts_property_key, ts_string, EmitContext};
use crate::error::AppResult;
use crate::spec::models::{
    BooleanFacets, IntegerFacets, NumberFacets, ObjectNode, SchemaNode, StringFacets,
    TaggedUnionNode,
};

/// Emits the runtime-check expression for `node`.
pub fn emit_validator(node: &SchemaNode, ctx: &mut EmitContext<'_>) -> AppResult<String> {
    match node {
        SchemaNode::Ref(r) => {
            ctx.record_ref(&r.target)?;
            Ok(r.target.clone())
        }
        SchemaNode::Null => Err(ctx.unsupported("unconstrained null")),
        SchemaNode::Str(f) => Ok(string_validator(f)),
        SchemaNode::NullableStr(f) => Ok(format!("{}.orNull()", string_validator(f))),
        SchemaNode::Int(f) => Ok(integer_validator(f)),
        SchemaNode::NullableInt(f) => Ok(format!("{}.orNull()", integer_validator(f))),
        SchemaNode::Num(f) => Ok(number_validator(f)),
        SchemaNode::Bool(f) => Ok(boolean_validator(f)),
        SchemaNode::Object(o) => object_validator(o, ctx),
        SchemaNode::Dictionary(values) => {
            Ok(format!("v.record({})", emit_validator(values, ctx)?))
        }
        SchemaNode::Array(a) => {
            let Some(items) = &a.items else {
                return Err(ctx.unsupported("array without items"));
            };
            let mut out = format!("v.arr({})", emit_validator(items, ctx)?);
            if let Some(min) = a.min_items {
                out.push_str(&format!(".minItems({})", min));
            }
            if let Some(max) = a.max_items {
                out.push_str(&format!(".maxItems({})", max));
            }
            Ok(out)
        }
        SchemaNode::OneOf(members) => {
            let mut parts = Vec::with_capacity(members.len());
            for member in members {
                parts.push(emit_validator(member, ctx)?);
            }
            Ok(format!("v.union([{}])", parts.join(", ")))
        }
        SchemaNode::AllOf(first, second) => {
            // Intersection with null is the nullable-reference pattern.
            if **second == SchemaNode::Null {
                return Ok(format!("v.nullable({})", emit_validator(first, ctx)?));
            }
            let a = emit_validator(first, ctx)?;
            let b = emit_validator(second, ctx)?;
            Ok(format!("v.all({}, {})", a, b))
        }
        SchemaNode::TaggedAnyOf(t) => tagged_validator(t, ctx),
    }
}

fn string_validator(f: &StringFacets) -> String {
    let mut out = String::from("v.str()");
    if let Some(constant) = &f.constant {
        out.push_str(&format!(".eq({})", ts_string(constant)));
    }
    if !f.one_of.is_empty() {
        let values: Vec<String> = f.one_of.iter().map(|s| ts_string(s)).collect();
        out.push_str(&format!(".oneOf([{}])", values.join(", ")));
    }
    if let Some(format) = &f.format {
        out.push_str(&format!(".format({})", ts_string(format)));
    }
    if let Some(min) = f.min_length {
        out.push_str(&format!(".min({})", min));
    }
    if let Some(max) = f.max_length {
        out.push_str(&format!(".max({})", max));
    }
    if let Some(pattern) = &f.pattern {
        out.push_str(&format!(".pattern({})", ts_string(pattern)));
    }
    out
}

fn integer_validator(f: &IntegerFacets) -> String {
    let mut out = String::from("v.int()");
    if let Some(constant) = f.constant {
        out.push_str(&format!(".eq({})", constant));
    }
    if !f.one_of.is_empty() {
        let values: Vec<String> = f.one_of.iter().map(i64::to_string).collect();
        out.push_str(&format!(".oneOf([{}])", values.join(", ")));
    }
    if let Some(format) = &f.format {
        out.push_str(&format!(".format({})", ts_string(format)));
    }
    if let Some(min) = f.minimum {
        out.push_str(&format!(".min({})", min));
    }
    if let Some(max) = f.maximum {
        out.push_str(&format!(".max({})", max));
    }
    out
}

fn number_validator(f: &NumberFacets) -> String {
    let mut out = String::from("v.num()");
    if let Some(format) = &f.format {
        out.push_str(&format!(".format({})", ts_string(format)));
    }
    if let Some(min) = f.minimum {
        out.push_str(&format!(".min({})", min));
    }
    if let Some(max) = f.maximum {
        out.push_str(&format!(".max({})", max));
    }
    out
}

fn boolean_validator(f: &BooleanFacets) -> String {
    match f.constant {
        Some(constant) => format!("v.bool().eq({})", constant),
        None => String::from("v.bool()"),
    }
}

fn object_validator(o: &ObjectNode, ctx: &mut EmitContext<'_>) -> AppResult<String> {
    let mut fields = Vec::with_capacity(o.properties.len());
    for (name, property) in &o.properties {
        let inner = emit_validator(&property.schema, ctx)?;
        let value = if o.required.contains(name) {
            inner
        } else {
            format!("v.opt({})", inner)
        };
        fields.push(format!("{}: {}", ts_property_key(name), value));
    }
    let constructor = if o.sealed { "v.sealed" } else { "v.obj" };
    if fields.is_empty() {
        Ok(format!("{}({{}})", constructor))
    } else {
        Ok(format!("{}({{ {} }})", constructor, fields.join(", ")))
    }
}

/// Dispatch is strictly on the discriminator field's value; members are never
/// trial-matched.
fn tagged_validator(t: &TaggedUnionNode, ctx: &mut EmitContext<'_>) -> AppResult<String> {
    for member in &t.members {
        ctx.record_ref(&member.target)?;
    }
    let mut arms = Vec::with_capacity(t.mapping.len());
    for (value, target) in &t.mapping {
        ctx.record_ref(target)?;
        arms.push(format!("{}: {}", ts_string(value), target));
    }
    Ok(format!(
        "v.tagged({}, {{ {} }})",
        ts_string(&t.property),
        arms.join(", ")
    ))
}
