#![deny(missing_docs)]

//! # Parameter & Body Composition
//!
//! Merges an operation's own parameters, path parameters inherited from its
//! tag document, and an optional request body into one input shape and a
//! path template.
//!
//! The input shape stays an intersection of independent pieces (path object,
//! query object, body wrapper) because each concern may be independently
//! absent; a single surviving piece collapses to itself.

use crate::emit::types::emit_type;
use crate::emit::EmitContext;
use crate::error::{AppError, AppResult};
use crate::spec::models::{
    ObjectNode, ParamLocation, ParameterDescriptor, Property, RequestBodyDescriptor, SchemaNode,
};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashSet};

/// The composed call surface of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedInput {
    /// The `params` argument type; `None` when the operation takes nothing.
    pub input_type: Option<String>,
    /// TypeScript expression producing the request path: a plain string
    /// literal, or a template literal interpolating `params.<name>`.
    pub path_expr: String,
    /// Names of query parameters, declaration order; the client forwards
    /// them as the request's `query` object.
    pub query_names: Vec<String>,
    /// Whether a request body piece is present.
    pub has_body: bool,
}

/// Composes the input shape and path template for one operation.
///
/// `indent` is the column at which the emitted input type starts (method
/// signatures sit two columns into the client object literal).
pub fn compose(
    path: &str,
    own: &[ParameterDescriptor],
    inherited: &[ParameterDescriptor],
    body: Option<&RequestBodyDescriptor>,
    indent: usize,
    ctx: &mut EmitContext<'_>,
) -> AppResult<ComposedInput> {
    let merged = merge_parameters(own, inherited);

    let path_params: Vec<&ParameterDescriptor> = merged
        .iter()
        .filter(|p| p.location == ParamLocation::Path)
        .copied()
        .collect();
    let query_params: Vec<&ParameterDescriptor> = merged
        .iter()
        .filter(|p| p.location == ParamLocation::Query)
        .copied()
        .collect();

    let path_expr = render_path_expr(path, &path_params, ctx)?;

    let mut pieces = Vec::new();
    if !path_params.is_empty() {
        pieces.push(emit_type(&piece_object(&path_params), indent, ctx)?);
    }
    if !query_params.is_empty() {
        pieces.push(emit_type(&piece_object(&query_params), indent, ctx)?);
    }
    if let Some(body) = body {
        let wrapper = body_piece(body);
        pieces.push(emit_type(&wrapper, indent, ctx)?);
    }

    let input_type = if pieces.is_empty() {
        None
    } else {
        Some(pieces.join(" & "))
    };

    Ok(ComposedInput {
        input_type,
        path_expr,
        query_names: query_params.iter().map(|p| p.name.clone()).collect(),
        has_body: body.is_some(),
    })
}

/// Own parameters win over inherited ones on a (name, location) collision.
fn merge_parameters<'a>(
    own: &'a [ParameterDescriptor],
    inherited: &'a [ParameterDescriptor],
) -> Vec<&'a ParameterDescriptor> {
    let mut own_keys = HashSet::new();
    for param in own {
        own_keys.insert((param.name.as_str(), param.location));
    }
    let mut result: Vec<&ParameterDescriptor> = Vec::new();
    for param in inherited {
        if !own_keys.contains(&(param.name.as_str(), param.location)) {
            result.push(param);
        }
    }
    result.extend(own.iter());
    result
}

/// Wraps a parameter list as a synthetic object node so type emission,
/// optionality markers, and the single-field inlining rule apply uniformly.
fn piece_object(params: &[&ParameterDescriptor]) -> SchemaNode {
    let mut properties = IndexMap::new();
    let mut required = BTreeSet::new();
    for param in params {
        properties.insert(
            param.name.clone(),
            Property {
                schema: param.schema.clone(),
                description: param.description.clone(),
            },
        );
        if param.required {
            required.insert(param.name.clone());
        }
    }
    SchemaNode::Object(ObjectNode {
        title: None,
        properties,
        required,
        sealed: false,
    })
}

fn body_piece(body: &RequestBodyDescriptor) -> SchemaNode {
    let mut properties = IndexMap::new();
    properties.insert(
        "body".to_string(),
        Property {
            schema: body.schema.clone(),
            description: None,
        },
    );
    let mut required = BTreeSet::new();
    required.insert("body".to_string());
    SchemaNode::Object(ObjectNode {
        title: None,
        properties,
        required,
        sealed: false,
    })
}

/// Rewrites `{name}` placeholders to `params.name` interpolations.
fn render_path_expr(
    path: &str,
    path_params: &[&ParameterDescriptor],
    ctx: &EmitContext<'_>,
) -> AppResult<String> {
    if !path.contains('{') {
        return Ok(crate::emit::ts_string(path));
    }

    let declared: BTreeSet<&str> = path_params.iter().map(|p| p.name.as_str()).collect();
    let mut out = String::from("`");
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let (literal, tail) = rest.split_at(open);
        out.push_str(literal);
        let close = tail.find('}').ok_or_else(|| {
            AppError::General(format!(
                "Unterminated placeholder in path '{}' ({})",
                path,
                ctx.document()
            ))
        })?;
        let name = &tail[1..close];
        if !declared.contains(name) {
            return Err(AppError::General(format!(
                "Path '{}' interpolates '{}' but no such path parameter is declared ({})",
                path,
                name,
                ctx.document()
            )));
        }
        out.push_str(&format!("${{params.{}}}", name));
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    out.push('`');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::classify::classify;
    use crate::spec::models::BodyContent;
    use crate::spec::refs::Resolver;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn param(name: &str, location: ParamLocation, required: bool) -> ParameterDescriptor {
        ParameterDescriptor {
            name: name.to_string(),
            location,
            required,
            schema: classify("t", &json!({ "type": "string" })).unwrap(),
            description: None,
        }
    }

    fn ctx_fixture(known: &std::collections::BTreeSet<String>) -> EmitContext<'_> {
        EmitContext::new(Resolver::new(known, "client"))
    }

    #[test]
    fn test_path_template_interpolation() {
        let known = Default::default();
        let mut ctx = ctx_fixture(&known);
        let username = param("username", ParamLocation::Path, true);
        let composed = compose(
            "/api/user/{username}/note",
            &[],
            std::slice::from_ref(&username),
            None,
            0,
            &mut ctx,
        )
        .unwrap();

        assert_eq!(composed.path_expr, "`/api/user/${params.username}/note`");
        assert_eq!(
            composed.input_type.as_deref(),
            Some("{ username: string }")
        );
        assert!(composed.query_names.is_empty());
        assert!(!composed.has_body);
    }

    #[test]
    fn test_literal_path_without_parameters() {
        let known = Default::default();
        let mut ctx = ctx_fixture(&known);
        let composed = compose("/api/account", &[], &[], None, 0, &mut ctx).unwrap();
        assert_eq!(composed.path_expr, "'/api/account'");
        assert!(composed.input_type.is_none());
    }

    #[test]
    fn test_unknown_placeholder_fails() {
        let known = Default::default();
        let mut ctx = ctx_fixture(&known);
        let err = compose("/api/user/{username}", &[], &[], None, 0, &mut ctx).unwrap_err();
        assert!(format!("{}", err).contains("username"));
    }

    #[test]
    fn test_pieces_stay_independent() {
        let known = Default::default();
        let mut ctx = ctx_fixture(&known);
        let path_param = param("id", ParamLocation::Path, true);
        let query_param = param("moves", ParamLocation::Query, false);
        let body = RequestBodyDescriptor {
            content: BodyContent::PlainText,
            schema: classify("t", &json!({ "type": "string" })).unwrap(),
        };

        let composed = compose(
            "/api/board/game/{id}/move",
            &[path_param, query_param],
            &[],
            Some(&body),
            0,
            &mut ctx,
        )
        .unwrap();

        assert_eq!(
            composed.input_type.as_deref(),
            Some("{ id: string } & { moves?: string } & { body: string }")
        );
        assert_eq!(composed.query_names, vec!["moves".to_string()]);
        assert!(composed.has_body);
    }

    #[test]
    fn test_own_parameter_overrides_inherited() {
        let known = Default::default();
        let mut ctx = ctx_fixture(&known);
        let inherited = param("username", ParamLocation::Path, true);
        let mut own = param("username", ParamLocation::Path, true);
        own.schema = classify("t", &json!({ "type": "string", "minLength": 2 })).unwrap();

        let composed = compose(
            "/api/user/{username}",
            std::slice::from_ref(&own),
            std::slice::from_ref(&inherited),
            None,
            0,
            &mut ctx,
        )
        .unwrap();

        // One piece, one field: the override, not two copies.
        assert_eq!(
            composed.input_type.as_deref(),
            Some("{ username: string }")
        );
    }

    #[test]
    fn test_same_name_in_both_locations_is_kept_twice() {
        let known = Default::default();
        let mut ctx = ctx_fixture(&known);
        let in_path = param("color", ParamLocation::Path, true);
        let in_query = param("color", ParamLocation::Query, false);

        let composed = compose(
            "/x/{color}",
            &[in_path, in_query],
            &[],
            None,
            0,
            &mut ctx,
        )
        .unwrap();

        assert_eq!(
            composed.input_type.as_deref(),
            Some("{ color: string } & { color?: string }")
        );
    }

    #[test]
    fn test_multi_parameter_query_piece_is_multiline() {
        let known = Default::default();
        let mut ctx = ctx_fixture(&known);
        let a = param("max", ParamLocation::Query, false);
        let b = param("since", ParamLocation::Query, false);

        let composed = compose("/api/games", &[a, b], &[], None, 0, &mut ctx).unwrap();
        assert_eq!(
            composed.input_type.as_deref(),
            Some("{\n  max?: string;\n  since?: string;\n}")
        );
        assert_eq!(
            composed.query_names,
            vec!["max".to_string(), "since".to_string()]
        );
    }
}
