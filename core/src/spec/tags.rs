#![deny(missing_docs)]

//! # Tag Document Parsing
//!
//! Builds [`TagDocument`] IR from a raw resource document.
//!
//! A tag document's keys are drawn from the HTTP method set {get, post, head,
//! delete, put} plus two special keys: `parameters` (path parameters shared
//! by every sibling method) and `server` (a base-URL override for operations
//! hosted off the default host). Any other key aborts the run.

use crate::error::{AppError, AppResult};
use crate::spec::classify::classify;
use crate::spec::models::{
    BodyContent, HttpMethod, OperationDescriptor, ParamLocation, ParameterDescriptor,
    RequestBodyDescriptor, ResponseContent, ResponseDescriptor, TagDocument,
};
use crate::spec::shims::{ShimOperation, ShimParameter};
use heck::ToLowerCamelCase;
use serde_json::Value as JsonValue;
use std::collections::HashSet;

/// Parses a raw tag document bound to `path` into its IR form.
///
/// Method keys are processed in declaration order; `parameters` and `server`
/// may appear anywhere among them.
pub fn parse_tag_document(name: &str, path: &str, raw: &JsonValue) -> AppResult<TagDocument> {
    let map = raw.as_object().ok_or_else(|| {
        AppError::General(format!("Tag document '{}' must be a mapping", name))
    })?;

    let mut operations = Vec::new();
    let mut shared_parameters = Vec::new();
    let mut server = None;

    for (key, value) in map {
        if let Some(method) = HttpMethod::from_key(key) {
            let shim: ShimOperation = serde_json::from_value(value.clone()).map_err(|e| {
                AppError::General(format!(
                    "Malformed '{}' operation in tag document '{}': {}",
                    key, name, e
                ))
            })?;
            operations.push(build_operation(name, path, method, shim)?);
        } else if key == "parameters" {
            let shims: Vec<ShimParameter> =
                serde_json::from_value(value.clone()).map_err(|e| {
                    AppError::General(format!(
                        "Malformed shared parameters in tag document '{}': {}",
                        name, e
                    ))
                })?;
            for shim in shims {
                let param = build_parameter(name, "shared", &shim)?;
                if param.location != ParamLocation::Path {
                    return Err(AppError::General(format!(
                        "Shared parameter '{}' in tag document '{}' must be a path parameter",
                        param.name, name
                    )));
                }
                shared_parameters.push(param);
            }
        } else if key == "server" {
            let url = value.as_str().ok_or_else(|| {
                AppError::General(format!(
                    "'server' in tag document '{}' must be a string",
                    name
                ))
            })?;
            server = Some(url.to_string());
        } else {
            return Err(AppError::General(format!(
                "Tag document '{}' has unsupported key '{}'",
                name, key
            )));
        }
    }

    Ok(TagDocument {
        name: name.to_string(),
        operations,
        shared_parameters,
        server,
    })
}

fn build_operation(
    tag: &str,
    path: &str,
    method: HttpMethod,
    shim: ShimOperation,
) -> AppResult<OperationDescriptor> {
    let id = match &shim.id {
        Some(id) => id.clone(),
        None => derive_method_name(method, path),
    };

    let mut parameters = Vec::new();
    for param in &shim.parameters {
        parameters.push(build_parameter(tag, method.as_str(), param)?);
    }

    let body = match shim.body {
        Some(raw_body) => {
            let content = match raw_body.content.as_str() {
                "json" => BodyContent::Json,
                "text" => BodyContent::PlainText,
                "form" => BodyContent::Form,
                other => {
                    return Err(AppError::General(format!(
                        "Operation '{}' in '{}' has unsupported body content '{}'",
                        id, tag, other
                    )))
                }
            };
            let schema_path = format!("{}#/{}/body", tag, method.as_str());
            Some(RequestBodyDescriptor {
                content,
                schema: classify(&schema_path, &raw_body.schema)?,
            })
        }
        None => None,
    };

    let mut responses = Vec::new();
    let mut seen_statuses = HashSet::new();
    for (status_key, response) in &shim.responses {
        let status: u16 = status_key.parse().map_err(|_| {
            AppError::General(format!(
                "Operation '{}' in '{}' has non-numeric status '{}'",
                id, tag, status_key
            ))
        })?;
        if !seen_statuses.insert(status) {
            return Err(AppError::General(format!(
                "Operation '{}' in '{}' declares status {} twice",
                id, tag, status
            )));
        }

        let content = match response.content.as_deref() {
            None => ResponseContent::NoContent,
            Some("json") => ResponseContent::Json,
            Some("ndjson") => ResponseContent::Ndjson,
            Some("pgn") => ResponseContent::Pgn,
            Some("mixed") => ResponseContent::Mixed,
            Some(other) => {
                return Err(AppError::General(format!(
                    "Operation '{}' in '{}' has unsupported response content '{}' for status {}",
                    id, tag, other, status
                )))
            }
        };

        let schema = match (content, &response.schema) {
            (ResponseContent::Json | ResponseContent::Ndjson, Some(raw)) => {
                let schema_path = format!("{}#/{}/responses/{}", tag, method.as_str(), status);
                Some(classify(&schema_path, raw)?)
            }
            (ResponseContent::Json | ResponseContent::Ndjson, None) => {
                return Err(AppError::General(format!(
                    "Operation '{}' in '{}' requires a schema for validated status {}",
                    id, tag, status
                )))
            }
            (_, Some(_)) => {
                return Err(AppError::General(format!(
                    "Operation '{}' in '{}' must not carry a schema for status {}",
                    id, tag, status
                )))
            }
            (_, None) => None,
        };

        responses.push(ResponseDescriptor {
            status,
            content,
            schema,
        });
    }

    Ok(OperationDescriptor {
        id,
        method,
        parameters,
        body,
        responses,
        anonymous: matches!(shim.security.as_deref(), Some([])),
        deprecated: shim.deprecated,
        description: shim.description,
    })
}

fn build_parameter(tag: &str, scope: &str, shim: &ShimParameter) -> AppResult<ParameterDescriptor> {
    let location = match shim.location.as_str() {
        "path" => ParamLocation::Path,
        "query" => ParamLocation::Query,
        other => {
            return Err(AppError::General(format!(
                "Parameter '{}' in '{}' has unsupported location '{}'",
                shim.name, tag, other
            )))
        }
    };

    if location == ParamLocation::Path && !shim.required {
        return Err(AppError::General(format!(
            "Path parameter '{}' in '{}' must set required: true",
            shim.name, tag
        )));
    }

    let schema_path = format!("{}#/{}/parameters/{}", tag, scope, shim.name);
    Ok(ParameterDescriptor {
        name: shim.name.clone(),
        location,
        required: shim.required,
        schema: classify(&schema_path, &shim.schema)?,
        description: shim.description.clone(),
    })
}

/// Derives a method name when the operation carries no explicit id.
///
/// `get` + `/api/user/{username}/note` → `getApiUserUsernameNote`.
fn derive_method_name(method: HttpMethod, path: &str) -> String {
    let cleaned = path.replace(['{', '}'], "").replace('/', " ");
    format!("{} {}", method.as_str(), cleaned).to_lower_camel_case()
}
