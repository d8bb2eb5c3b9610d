#![deny(missing_docs)]

//! # Response Dispatch Compilation
//!
//! Compiles an operation's status→response map into the dispatch table the
//! generated client hands to the transport.
//!
//! Validated variants (json, ndjson) embed their schema's validator; marker
//! variants (pgn, mixed, no-content) never carry one — those bodies are
//! classified by content type, not schema-checked. An observed status with no
//! table entry is the runtime's `UnexpectedStatusError`; nothing here ever
//! swallows it.

use crate::emit::types::emit_type;
use crate::emit::validators::emit_validator;
use crate::emit::EmitContext;
use crate::error::{AppError, AppResult};
use crate::spec::models::{ResponseContent, ResponseDescriptor};

/// Renders the dispatch table literal, one entry per declared status, in
/// declaration order.
pub fn compile_dispatch(
    responses: &[ResponseDescriptor],
    ctx: &mut EmitContext<'_>,
) -> AppResult<String> {
    let mut entries = Vec::with_capacity(responses.len());
    for response in responses {
        let handler = match response.content {
            ResponseContent::Json => format!("json({})", schema_validator(response, ctx)?),
            ResponseContent::Ndjson => format!("ndjson({})", schema_validator(response, ctx)?),
            ResponseContent::Pgn => String::from("pgn()"),
            ResponseContent::Mixed => String::from("mixed()"),
            ResponseContent::NoContent => String::from("none()"),
        };
        entries.push(format!("{}: {}", response.status, handler));
    }
    if entries.is_empty() {
        Ok(String::from("{}"))
    } else {
        Ok(format!("{{ {} }}", entries.join(", ")))
    }
}

/// Renders the method's return type: the alternative of every declared
/// response's decoded type, deduplicated, declaration order.
pub fn response_type(
    responses: &[ResponseDescriptor],
    ctx: &mut EmitContext<'_>,
) -> AppResult<String> {
    let mut parts: Vec<String> = Vec::new();
    for response in responses {
        let part = match response.content {
            ResponseContent::Json => emit_type(schema_of(response, ctx)?, 0, ctx)?,
            ResponseContent::Ndjson => {
                let element = emit_type(schema_of(response, ctx)?, 0, ctx)?;
                if element.contains(" | ") || element.contains(" & ") {
                    format!("({})[]", element)
                } else {
                    format!("{}[]", element)
                }
            }
            ResponseContent::Pgn => String::from("string"),
            ResponseContent::Mixed => String::from("unknown"),
            ResponseContent::NoContent => String::from("void"),
        };
        if !parts.contains(&part) {
            parts.push(part);
        }
    }
    if parts.is_empty() {
        Ok(String::from("never"))
    } else {
        Ok(parts.join(" | "))
    }
}

fn schema_validator(
    response: &ResponseDescriptor,
    ctx: &mut EmitContext<'_>,
) -> AppResult<String> {
    let schema = schema_of(response, ctx)?;
    emit_validator(schema, ctx)
}

fn schema_of<'r>(
    response: &'r ResponseDescriptor,
    ctx: &EmitContext<'_>,
) -> AppResult<&'r crate::spec::models::SchemaNode> {
    response.schema.as_ref().ok_or_else(|| {
        AppError::General(format!(
            "Validated status {} in '{}' has no schema",
            response.status,
            ctx.document()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::classify::classify;
    use crate::spec::refs::Resolver;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn response(status: u16, content: ResponseContent, raw: Option<serde_json::Value>) -> ResponseDescriptor {
        ResponseDescriptor {
            status,
            content,
            schema: raw.map(|r| classify("t", &r).unwrap()),
        }
    }

    #[test]
    fn test_dispatch_mixes_validated_and_marker_entries() {
        let known: BTreeSet<String> = ["Account".to_string()].into();
        let mut ctx = EmitContext::new(Resolver::new(&known, "client"));

        let responses = vec![
            response(
                200,
                ResponseContent::Json,
                Some(json!({ "$ref": "./Account.yaml" })),
            ),
            response(404, ResponseContent::NoContent, None),
        ];

        let table = compile_dispatch(&responses, &mut ctx).unwrap();
        assert_eq!(table, "{ 200: json(Account), 404: none() }");

        let deps: Vec<String> = ctx.into_dependencies().into_iter().collect();
        assert_eq!(deps, vec!["Account".to_string()]);
    }

    #[test]
    fn test_ndjson_embeds_validator_and_returns_array_type() {
        let known: BTreeSet<String> = ["GameJson".to_string()].into();
        let mut ctx = EmitContext::new(Resolver::new(&known, "client"));

        let responses = vec![response(
            200,
            ResponseContent::Ndjson,
            Some(json!({ "$ref": "./GameJson.yaml" })),
        )];

        assert_eq!(
            compile_dispatch(&responses, &mut ctx).unwrap(),
            "{ 200: ndjson(GameJson) }"
        );
        assert_eq!(response_type(&responses, &mut ctx).unwrap(), "GameJson[]");
    }

    #[test]
    fn test_marker_entries_never_carry_validators() {
        let known = BTreeSet::new();
        let mut ctx = EmitContext::new(Resolver::new(&known, "client"));

        let responses = vec![
            response(200, ResponseContent::Pgn, None),
            response(204, ResponseContent::Mixed, None),
        ];

        assert_eq!(
            compile_dispatch(&responses, &mut ctx).unwrap(),
            "{ 200: pgn(), 204: mixed() }"
        );
        assert_eq!(
            response_type(&responses, &mut ctx).unwrap(),
            "string | unknown"
        );
        assert!(ctx.into_dependencies().is_empty());
    }

    #[test]
    fn test_inline_schema_in_dispatch() {
        let known = BTreeSet::new();
        let mut ctx = EmitContext::new(Resolver::new(&known, "client"));

        let responses = vec![response(
            200,
            ResponseContent::Json,
            Some(json!({
                "type": "object",
                "properties": { "ok": { "type": "boolean" } },
                "required": ["ok"]
            })),
        )];

        assert_eq!(
            compile_dispatch(&responses, &mut ctx).unwrap(),
            "{ 200: json(v.obj({ ok: v.bool() })) }"
        );
    }

    #[test]
    fn test_response_type_deduplicates() {
        let known = BTreeSet::new();
        let mut ctx = EmitContext::new(Resolver::new(&known, "client"));

        let responses = vec![
            response(200, ResponseContent::NoContent, None),
            response(204, ResponseContent::NoContent, None),
        ];
        assert_eq!(response_type(&responses, &mut ctx).unwrap(), "void");
    }
}
