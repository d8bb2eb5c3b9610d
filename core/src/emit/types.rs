#![deny(missing_docs)]

//! # Type Emission
//!
//! Mirrors validator emission for static TypeScript type signatures.
//!
//! Formatting is a stable choice with no semantic effect: single-field
//! objects collapse to one line, multi-field objects take a two-space
//! indented multi-line form. Both are deterministic so snapshot-style tests
//! can compare whole strings.

use crate::emit::{doc_comment, ts_property_key, ts_string, EmitContext};
use crate::error::AppResult;
use crate::spec::models::{IntegerFacets, ObjectNode, SchemaNode, StringFacets};

/// Emits the static type expression for `node`.
///
/// `indent` is the column at which the expression starts; only multi-line
/// object forms consume it.
pub fn emit_type(node: &SchemaNode, indent: usize, ctx: &mut EmitContext<'_>) -> AppResult<String> {
    match node {
        SchemaNode::Ref(r) => {
            ctx.record_ref(&r.target)?;
            Ok(r.target.clone())
        }
        SchemaNode::Null => Err(ctx.unsupported("unconstrained null")),
        SchemaNode::Str(f) => Ok(string_type(f)),
        SchemaNode::NullableStr(f) => Ok(format!("{} | null", string_type(f))),
        SchemaNode::Int(f) => Ok(integer_type(f)),
        SchemaNode::NullableInt(f) => Ok(format!("{} | null", integer_type(f))),
        SchemaNode::Num(_) => Ok(String::from("number")),
        SchemaNode::Bool(f) => Ok(match f.constant {
            Some(constant) => constant.to_string(),
            None => String::from("boolean"),
        }),
        SchemaNode::Object(o) => object_type(o, indent, ctx),
        SchemaNode::Dictionary(values) => Ok(format!(
            "Record<string, {}>",
            emit_type(values, indent, ctx)?
        )),
        SchemaNode::Array(a) => {
            let Some(items) = &a.items else {
                return Err(ctx.unsupported("array without items"));
            };
            let element = emit_type(items, indent, ctx)?;
            // Alternatives and intersections bind looser than [].
            if element.contains(" | ") || element.contains(" & ") {
                Ok(format!("({})[]", element))
            } else {
                Ok(format!("{}[]", element))
            }
        }
        SchemaNode::OneOf(members) => {
            let mut parts = Vec::with_capacity(members.len());
            for member in members {
                parts.push(emit_type(member, indent, ctx)?);
            }
            Ok(parts.join(" | "))
        }
        SchemaNode::AllOf(first, second) => {
            // The allOf-with-null pattern reads as "T or null", not "T and null".
            if **second == SchemaNode::Null {
                return Ok(format!("{} | null", emit_type(first, indent, ctx)?));
            }
            let a = emit_type(first, indent, ctx)?;
            let b = emit_type(second, indent, ctx)?;
            Ok(format!("{} & {}", a, b))
        }
        SchemaNode::TaggedAnyOf(t) => {
            let mut parts = Vec::with_capacity(t.members.len());
            for member in &t.members {
                ctx.record_ref(&member.target)?;
                parts.push(member.target.clone());
            }
            Ok(parts.join(" | "))
        }
    }
}

fn string_type(f: &StringFacets) -> String {
    if let Some(constant) = &f.constant {
        return ts_string(constant);
    }
    if !f.one_of.is_empty() {
        let values: Vec<String> = f.one_of.iter().map(|s| ts_string(s)).collect();
        return values.join(" | ");
    }
    String::from("string")
}

fn integer_type(f: &IntegerFacets) -> String {
    if let Some(constant) = f.constant {
        return constant.to_string();
    }
    if !f.one_of.is_empty() {
        let values: Vec<String> = f.one_of.iter().map(i64::to_string).collect();
        return values.join(" | ");
    }
    String::from("number")
}

fn object_type(o: &ObjectNode, indent: usize, ctx: &mut EmitContext<'_>) -> AppResult<String> {
    if o.properties.is_empty() {
        return Ok(String::from("{}"));
    }

    if o.properties.len() == 1 {
        let (name, property) = o.properties.first().expect("non-empty");
        let marker = if o.required.contains(name) { "" } else { "?" };
        let inner = emit_type(&property.schema, indent, ctx)?;
        return Ok(format!(
            "{{ {}{}: {} }}",
            ts_property_key(name),
            marker,
            inner
        ));
    }

    let field_pad = " ".repeat(indent + 2);
    let close_pad = " ".repeat(indent);
    let mut out = String::from("{\n");
    for (name, property) in &o.properties {
        if let Some(description) = &property.description {
            out.push_str(&doc_comment(&[description.as_str()], indent + 2));
        }
        let marker = if o.required.contains(name) { "" } else { "?" };
        let inner = emit_type(&property.schema, indent + 2, ctx)?;
        out.push_str(&format!(
            "{}{}{}: {};\n",
            field_pad,
            ts_property_key(name),
            marker,
            inner
        ));
    }
    out.push_str(&close_pad);
    out.push('}');
    Ok(out)
}
