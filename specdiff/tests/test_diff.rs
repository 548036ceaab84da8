// Copyright 2025 Oxide Computer Company

//! End-to-end tests: loose JSON documents in, classified report out.

use anyhow::Result;
use serde_json::json;
use slog::Logger;
use specdiff::diff_specs;
use specdiff::ConfigLogging;
use specdiff::ConfigLoggingLevel;
use specdiff::InvalidDocument;
use specdiff::SpecDocument;

fn test_logger(name: &str) -> Logger {
    ConfigLogging::StderrTerminal { level: ConfigLoggingLevel::Debug }
        .to_logger(name)
        .expect("failed to create logger")
}

/// The old side of the worked example: a Swagger v2 document.
fn old_document() -> serde_json::Value {
    json!({
        "swagger": "2.0",
        "info": { "title": "example", "version": "1.0.0" },
        "definitions": {
            "User": {
                "type": "object",
                "properties": {
                    "id": { "type": "integer" },
                    "email": { "type": "string" }
                }
            },
            "Legacy": { "type": "object" }
        },
        "paths": {
            "/users": {
                "get": {
                    "parameters": [
                        { "name": "limit", "in": "query", "type": "integer" }
                    ],
                    "responses": {
                        "200": { "schema": { "$ref": "#/definitions/User" } }
                    }
                }
            },
            "/ping": { "get": {} }
        }
    })
}

/// The new side: the same API, reshaped as OpenAPI v3 and revised.
fn new_document() -> serde_json::Value {
    json!({
        "openapi": "3.0.3",
        "info": { "title": "example", "version": "2.0.0" },
        "components": {
            "schemas": {
                "User": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer" },
                        "email": { "type": "string" }
                    },
                    "required": ["email"]
                },
                "Audit": { "type": "object" }
            }
        },
        "paths": {
            "/users": {
                "get": {
                    "deprecated": true,
                    "parameters": [
                        { "name": "limit", "in": "query", "required": true,
                          "schema": { "type": "integer" } }
                    ],
                    "responses": {
                        "200": {
                            "description": "the user",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/User"
                                    }
                                }
                            }
                        }
                    }
                },
                "post": {
                    "responses": {}
                }
            },
            "/status": { "get": {} }
        }
    })
}

#[test]
fn test_cross_version_diff() -> Result<()> {
    let log = test_logger("test_cross_version_diff");
    let old = SpecDocument::from_json(&old_document())?;
    let new = SpecDocument::from_json(&new_document())?;

    let report = diff_specs(&log, &old, &new);

    // Findings span both version dialects: the v2 `$ref` response and the
    // v3 `content` response normalize to the same shape, so the unchanged
    // response body produces nothing.
    assert!(report.endpoints.added.contains("/status"));
    assert!(report.endpoints.added.contains("[/users] POST added"));
    assert!(report.endpoints.removed.contains("/ping"));
    assert!(report.endpoints.deprecated.contains("[/users] GET deprecated"));
    assert!(report
        .endpoints
        .breaking
        .contains("[GET /users] query parameter limit is now required"));
    assert!(report.models.added.contains("Audit"));
    assert!(report.models.removed.contains("Legacy"));
    assert!(report.models.breaking.contains("User"));
    assert!(report.endpoints.updated.is_empty());
    assert!(report.models.updated.is_empty());
    Ok(())
}

#[test]
fn test_serialized_report_matches_golden_file() -> Result<()> {
    let log = test_logger("test_serialized_report_matches_golden_file");
    let old = SpecDocument::from_json(&old_document())?;
    let new = SpecDocument::from_json(&new_document())?;

    let report = diff_specs(&log, &old, &new);
    let actual = format!("{}\n", serde_json::to_string_pretty(&report)?);
    expectorate::assert_contents("tests/data/cross_version_report.json", &actual);
    Ok(())
}

#[test]
fn test_diff_is_deterministic() -> Result<()> {
    let log = test_logger("test_diff_is_deterministic");
    let old = SpecDocument::from_json(&old_document())?;
    let new = SpecDocument::from_json(&new_document())?;

    let first = serde_json::to_string(&diff_specs(&log, &old, &new))?;
    let second = serde_json::to_string(&diff_specs(&log, &old, &new))?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_diff_against_self_is_empty() -> Result<()> {
    let log = test_logger("test_diff_against_self_is_empty");
    for document in [old_document(), new_document()] {
        let spec = SpecDocument::from_json(&document)?;
        let report = diff_specs(&log, &spec, &spec);
        assert!(report.is_empty(), "unexpected findings: {:?}", report);
    }
    Ok(())
}

#[test]
fn test_added_paths_mirror_removed_paths() -> Result<()> {
    let log = test_logger("test_added_paths_mirror_removed_paths");
    let a = SpecDocument::from_json(&old_document())?;
    let b = SpecDocument::from_json(&new_document())?;

    let forward = diff_specs(&log, &a, &b);
    let backward = diff_specs(&log, &b, &a);

    // Path-level and model-level findings are symmetric by construction.
    let path_added: Vec<_> = forward
        .endpoints
        .added
        .iter()
        .filter(|finding| finding.starts_with('/'))
        .collect();
    let path_removed: Vec<_> = backward.endpoints.removed.iter().collect();
    assert_eq!(path_added, path_removed);
    assert_eq!(forward.models.added, backward.models.removed);
    assert_eq!(forward.models.removed, backward.models.added);
    Ok(())
}

#[test]
fn test_empty_documents_produce_empty_report() -> Result<()> {
    let log = test_logger("test_empty_documents_produce_empty_report");
    let empty = SpecDocument::from_json(&json!({
        "paths": {},
        "definitions": {}
    }))?;
    let report = diff_specs(&log, &empty, &empty);
    assert!(report.is_empty());
    Ok(())
}

#[test]
fn test_malformed_document_is_rejected() {
    let error = SpecDocument::from_json(&json!(42)).unwrap_err();
    assert_eq!(error, InvalidDocument::RootNotObject);
    assert_eq!(
        error.to_string(),
        "specification document root is not an object"
    );
}
