//! End-to-end runs of the compiler core over in-memory documents.
//!
//! Everything here feeds YAML through the registry exactly the way the CLI
//! does, but without touching storage.

use chessgen_core::{generate, DocumentSet, PathEntry};
use pretty_assertions::assert_eq;
use serde_json::Value as JsonValue;

fn yaml(content: &str) -> JsonValue {
    let parsed: serde_yaml::Value = serde_yaml::from_str(content).unwrap();
    serde_json::to_value(parsed).unwrap()
}

fn fixture() -> DocumentSet {
    let mut docs = DocumentSet::new();

    docs.register_schema(
        "LightUser",
        yaml(
            r#"
type: object
description: Minimal public user projection.
properties:
  id:
    type: string
  name:
    type: string
  title:
    type: ["string", "null"]
required: [id, name]
"#,
        ),
    )
    .unwrap();

    docs.register_schema(
        "Clock",
        yaml(
            r#"
type: object
properties:
  initial:
    type: integer
    minimum: 0
  increment:
    type: integer
    minimum: 0
required: [initial, increment]
"#,
        ),
    )
    .unwrap();

    docs.register_schema(
        "GameJson",
        yaml(
            r#"
type: object
properties:
  id:
    type: string
  rated:
    type: boolean
  clock:
    allOf:
      - $ref: ./Clock.yaml
      - type: "null"
  players:
    type: object
    additionalProperties:
      $ref: ./LightUser.yaml
required: [id, rated]
"#,
        ),
    )
    .unwrap();

    docs.register_schema(
        "Ok",
        yaml(
            r#"
type: object
properties:
  ok:
    type: boolean
required: [ok]
additionalProperties: false
"#,
        ),
    )
    .unwrap();

    docs.register_tag(
        "account",
        yaml(
            r#"
get:
  id: accountMe
  description: Public information about the logged in user.
  responses:
    "200":
      content: json
      schema:
        $ref: ./LightUser.yaml
"#,
        ),
    )
    .unwrap();

    docs.register_tag(
        "games",
        yaml(
            r#"
parameters:
  - name: username
    in: path
    required: true
    schema:
      type: string
get:
  id: gamesExportByUser
  parameters:
    - name: max
      in: query
      schema:
        type: integer
        minimum: 1
  responses:
    "200":
      content: ndjson
      schema:
        $ref: ./GameJson.yaml
post:
  id: gamesImport
  body:
    content: text
    schema:
      type: string
  responses:
    "200":
      content: json
      schema:
        $ref: ./Ok.yaml
    "404": {}
"#,
        ),
    )
    .unwrap();

    docs.register_tag(
        "explorer",
        yaml(
            r#"
server: https://explorer.lichess.ovh
get:
  id: openingExplorerMasters
  security: []
  parameters:
    - name: fen
      in: query
      required: true
      schema:
        type: string
  responses:
    "200":
      content: json
      schema:
        type: object
        properties:
          white:
            type: integer
          draws:
            type: integer
          black:
            type: integer
        required: [white, draws, black]
"#,
        ),
    )
    .unwrap();

    docs.set_path_table(vec![
        PathEntry {
            path: "/api/account".into(),
            tag: "account".into(),
        },
        PathEntry {
            path: "/api/games/user/{username}".into(),
            tag: "games".into(),
        },
        PathEntry {
            path: "/masters".into(),
            tag: "explorer".into(),
        },
    ])
    .unwrap();

    docs
}

#[test]
fn schema_units_follow_registration_order() {
    let output = generate(&fixture()).unwrap();
    let names: Vec<&str> = output
        .schema_units
        .iter()
        .map(|u| u.name.as_str())
        .collect();
    assert_eq!(names, ["LightUser", "Clock", "GameJson", "Ok"]);
}

#[test]
fn game_unit_imports_are_sorted_and_deduplicated() {
    let output = generate(&fixture()).unwrap();
    let game = output
        .schema_units
        .iter()
        .find(|u| u.name == "GameJson")
        .unwrap();
    assert_eq!(
        game.dependencies,
        vec!["Clock".to_string(), "LightUser".to_string()]
    );

    let clock_at = game.source.find("import { Clock } from './Clock';").unwrap();
    let user_at = game
        .source
        .find("import { LightUser } from './LightUser';")
        .unwrap();
    assert!(clock_at < user_at);
}

#[test]
fn light_user_unit_snapshot() {
    let output = generate(&fixture()).unwrap();
    let unit = output
        .schema_units
        .iter()
        .find(|u| u.name == "LightUser")
        .unwrap();

    let expected = concat!(
        "import { v } from '../runtime';\n",
        "\n",
        "/** Minimal public user projection. */\n",
        "export const LightUser = v.obj({ id: v.str(), name: v.str(), title: v.opt(v.str().orNull()) });\n",
        "\n",
        "export type LightUser = {\n",
        "  id: string;\n",
        "  name: string;\n",
        "  title?: string | null;\n",
        "};\n"
    );
    assert_eq!(unit.source, expected);
}

#[test]
fn transitive_references_cover_indirect_targets() {
    let output = generate(&fixture()).unwrap();
    let game = output
        .documents
        .iter()
        .find(|d| d.name == "GameJson")
        .unwrap();
    let refs: Vec<&str> = game.references.iter().map(String::as_str).collect();
    assert_eq!(refs, ["Clock", "LightUser"]);
}

#[test]
fn client_methods_follow_path_table_order() {
    let output = generate(&fixture()).unwrap();
    let source = &output.client.source;

    let account_at = source.find("accountMe(").unwrap();
    let export_at = source.find("gamesExportByUser(").unwrap();
    let import_at = source.find("gamesImport(").unwrap();
    let explorer_at = source.find("openingExplorerMasters(").unwrap();

    assert!(account_at < export_at);
    assert!(export_at < import_at);
    assert!(import_at < explorer_at);
}

#[test]
fn client_threads_shared_parameters_and_dispatch() {
    let output = generate(&fixture()).unwrap();
    let source = &output.client.source;

    // Shared path parameter interpolates into both sibling methods of `games`.
    assert!(source.contains("`/api/games/user/${params.username}`"));
    assert!(source.contains("{ 200: ndjson(GameJson) }"));
    assert!(source.contains("{ 200: json(Ok), 404: none() }"));

    // Plain-text body rides the form-free marker.
    assert!(source.contains("body: params.body, bodyFormat: 'text'"));

    // The satellite host override and the anonymous marker stay scoped to
    // the explorer operation.
    assert!(source.contains("baseUrl: 'https://explorer.lichess.ovh'"));
    assert!(source.contains("anonymous: true"));
    let account_method = &source[source.find("accountMe(").unwrap()..source.find("gamesExportByUser(").unwrap()];
    assert!(!account_method.contains("baseUrl"));
    assert!(!account_method.contains("anonymous"));
}

#[test]
fn client_imports_only_touched_schemas() {
    let output = generate(&fixture()).unwrap();
    assert_eq!(
        output.client.dependencies,
        vec![
            "GameJson".to_string(),
            "LightUser".to_string(),
            "Ok".to_string()
        ]
    );
    // Clock is only reached through GameJson's own unit, never the client.
    assert!(!output.client.source.contains("from './schemas/Clock'"));
}

#[test]
fn generation_is_deterministic_under_parallel_compilation() {
    let first = generate(&fixture()).unwrap();
    let second = generate(&fixture()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unknown_schema_reference_aborts_the_run() {
    let mut docs = fixture();
    docs.register_schema("Broken", yaml("$ref: ./DoesNotExist.yaml"))
        .unwrap();

    let err = generate(&docs).unwrap_err();
    let message = format!("{}", err);
    assert!(message.contains("DoesNotExist"));
    assert!(message.contains("Broken"));
}

#[test]
fn runtime_unit_rides_along() {
    let output = generate(&fixture()).unwrap();
    assert_eq!(output.runtime.name, "runtime");
    assert!(output.runtime.source.contains("UnexpectedStatusError"));
}
