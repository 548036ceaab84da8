// Copyright 2025 Oxide Computer Company

//! Comparators for the two sides of a specification
//!
//! Reconciliation happens at three fixed levels: paths, then methods within
//! a shared path, then parameters and responses within a shared operation.
//! Model schemas are reconciled separately.  Every level walks a sorted
//! union of the keys on both sides, so output does not depend on document
//! order, and each finding is labeled exactly once: parameter- and
//! response-level findings pick up a `[<METHOD> <path>]` prefix as they are
//! merged into the operation's report, method-level findings carry a
//! `[<path>]` label of their own, and path- and model-level findings are
//! bare names.

use crate::report::format_label;
use crate::report::DiffReport;
use crate::spec::Method;
use crate::spec::Parameter;
use crate::spec::ParameterLocation;
use crate::spec::PathItem;
use crate::spec::Response;
use crate::spec::Schema;
use crate::spec::SpecDocument;
use indexmap::IndexMap;
use slog::Logger;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Computes the semantic difference between two versions of a specification.
///
/// `old` is the version existing clients were written against; `new` is the
/// proposed replacement.  The result classifies every endpoint and model
/// change; see [`DiffReport`].  This cannot fail: a document with empty
/// collections simply contributes nothing.
pub fn diff_specs(
    log: &Logger,
    old: &SpecDocument,
    new: &SpecDocument,
) -> DiffReport {
    debug!(log, "comparing specifications";
        "old_paths" => old.paths.len(),
        "new_paths" => new.paths.len(),
        "old_models" => old.definitions.len(),
        "new_models" => new.definitions.len(),
    );

    let mut report = DiffReport::new();
    report.merge_from(diff_models(&old.definitions, &new.definitions), None);
    report.merge_from(diff_endpoints(log, &old.paths, &new.paths), None);

    debug!(log, "specification diff complete"; "findings" => report.len());
    report
}

/// Sorted union of the keys on both sides.
fn key_union<'a, V>(
    old: &'a IndexMap<String, V>,
    new: &'a IndexMap<String, V>,
) -> BTreeSet<&'a str> {
    old.keys().chain(new.keys()).map(String::as_str).collect()
}

/// Reconciles the sets of path templates across both documents.
///
/// Paths present on only one side short-circuit: a removed path is reported
/// once and the operations under it are not compared.
pub fn diff_endpoints(
    log: &Logger,
    old_paths: &IndexMap<String, PathItem>,
    new_paths: &IndexMap<String, PathItem>,
) -> DiffReport {
    let mut report = DiffReport::new();
    for path in key_union(old_paths, new_paths) {
        match (old_paths.get(path), new_paths.get(path)) {
            (Some(_), None) => {
                report.endpoints.removed.insert(path.to_string());
            }
            (None, Some(_)) => {
                report.endpoints.added.insert(path.to_string());
            }
            (Some(old_item), Some(new_item)) => {
                trace!(log, "comparing operations"; "path" => path);
                report.merge_from(
                    diff_operations(path, old_item, new_item),
                    None,
                );
            }
            (None, None) => unreachable!("key came from the union"),
        }
    }
    report
}

/// Reconciles the HTTP methods defined under one shared path.
pub fn diff_operations(
    path: &str,
    old_item: &PathItem,
    new_item: &PathItem,
) -> DiffReport {
    let mut report = DiffReport::new();
    let path_label = format_label(&[path]);

    let methods: BTreeSet<Method> = old_item
        .operations
        .keys()
        .chain(new_item.operations.keys())
        .copied()
        .collect();

    for method in methods {
        let old_op = old_item.operations.get(&method);
        let new_op = new_item.operations.get(&method);
        match (old_op, new_op) {
            (Some(_), None) => {
                // Removing a method breaks every client still calling it.
                report
                    .endpoints
                    .breaking
                    .insert(format!("{} {} removed", path_label, method));
            }
            (None, Some(_)) => {
                report
                    .endpoints
                    .added
                    .insert(format!("{} {} added", path_label, method));
            }
            (Some(old_op), Some(new_op)) => {
                if new_op.deprecated && !old_op.deprecated {
                    report.endpoints.deprecated.insert(format!(
                        "{} {} deprecated",
                        path_label, method
                    ));
                }

                let op_label = format_label(&[method.as_str(), path]);
                report.merge_from(
                    diff_parameters(&old_op.parameters, &new_op.parameters),
                    Some(&op_label),
                );
                report.merge_from(
                    diff_responses(&old_op.responses, &new_op.responses),
                    Some(&op_label),
                );
            }
            (None, None) => unreachable!("key came from the union"),
        }
    }
    report
}

type ParamKey<'a> = (&'a str, ParameterLocation);

/// Indexes a parameter list by (name, location).
///
/// Keying by name alone would silently collide two differently-located
/// parameters of the same name, e.g. a path `id` and a query `id`.  A
/// duplicate pair is an authoring defect in the input, not grounds to abort
/// the diff: it is reported as an `updated` finding and the last declaration
/// wins.
fn parameters_by_key<'a>(
    params: &'a [Parameter],
    report: &mut DiffReport,
) -> BTreeMap<ParamKey<'a>, &'a Parameter> {
    let mut by_key = BTreeMap::new();
    for param in params {
        let previous =
            by_key.insert((param.name.as_str(), param.location), param);
        if previous.is_some() {
            report.endpoints.updated.insert(format!(
                "{} parameter {} is declared more than once",
                param.location, param.name
            ));
        }
    }
    by_key
}

/// Reconciles two parameter lists for one operation.  Findings are
/// unlabeled; the caller attaches the operation context.
pub fn diff_parameters(
    old_params: &[Parameter],
    new_params: &[Parameter],
) -> DiffReport {
    let mut report = DiffReport::new();
    let old_by_key = parameters_by_key(old_params, &mut report);
    let new_by_key = parameters_by_key(new_params, &mut report);

    let keys: BTreeSet<ParamKey<'_>> =
        old_by_key.keys().chain(new_by_key.keys()).copied().collect();

    for key in keys {
        match (old_by_key.get(&key), new_by_key.get(&key)) {
            (Some(old_param), None) => {
                report.endpoints.breaking.insert(format!(
                    "{} parameter {} has been removed",
                    old_param.location, old_param.name
                ));
            }
            (None, Some(new_param)) => {
                if new_param.required {
                    // A new required input breaks callers that omit it.
                    report.endpoints.breaking.insert(format!(
                        "{} parameter {} has been added as required",
                        new_param.location, new_param.name
                    ));
                } else {
                    report.endpoints.added.insert(format!(
                        "{} parameter {} has been added",
                        new_param.location, new_param.name
                    ));
                }
            }
            (Some(old_param), Some(new_param)) => {
                if !old_param.required && new_param.required {
                    report.endpoints.breaking.insert(format!(
                        "{} parameter {} is now required",
                        new_param.location, new_param.name
                    ));
                } else if old_param.required && !new_param.required {
                    report.endpoints.updated.insert(format!(
                        "{} parameter {} is no longer required",
                        new_param.location, new_param.name
                    ));
                }
                if old_param.schema != new_param.schema {
                    report.endpoints.breaking.insert(format!(
                        "{} parameter {} changes from {} to {}",
                        new_param.location,
                        new_param.name,
                        old_param.schema,
                        new_param.schema
                    ));
                }
            }
            (None, None) => unreachable!("key came from the union"),
        }
    }
    report
}

/// Reconciles the response maps of one shared operation.  Findings are
/// unlabeled; the caller attaches the operation context.
pub fn diff_responses(
    old_responses: &IndexMap<String, Response>,
    new_responses: &IndexMap<String, Response>,
) -> DiffReport {
    let mut report = DiffReport::new();
    for code in key_union(old_responses, new_responses) {
        match (old_responses.get(code), new_responses.get(code)) {
            (Some(_), None) => {
                report
                    .endpoints
                    .breaking
                    .insert(format!("response {} has been removed", code));
            }
            (None, Some(_)) => {
                report
                    .endpoints
                    .added
                    .insert(format!("response {} has been added", code));
            }
            (Some(old_resp), Some(new_resp)) => {
                diff_response_schema(
                    code,
                    old_resp.schema.as_ref(),
                    new_resp.schema.as_ref(),
                    &mut report,
                );
            }
            (None, None) => unreachable!("key came from the union"),
        }
    }
    report
}

/// Compares the body schemas of one shared response code, field by field.
///
/// A response field changing type or disappearing breaks consumers, as does
/// the body type itself changing; a field the new version promises to always
/// include is likewise treated as a contract change.
fn diff_response_schema(
    code: &str,
    old_schema: Option<&Schema>,
    new_schema: Option<&Schema>,
    report: &mut DiffReport,
) {
    let (old_schema, new_schema) = match (old_schema, new_schema) {
        (None, None) => return,
        (Some(_), None) => {
            report.endpoints.breaking.insert(format!(
                "response {} no longer documents a body",
                code
            ));
            return;
        }
        (None, Some(_)) => {
            report
                .endpoints
                .updated
                .insert(format!("response {} now documents a body", code));
            return;
        }
        (Some(old_schema), Some(new_schema)) => (old_schema, new_schema),
    };

    if old_schema.type_label != new_schema.type_label {
        report.endpoints.breaking.insert(format!(
            "response {} changes from {} to {}",
            code, old_schema.type_label, new_schema.type_label
        ));
    }

    let fields: BTreeSet<&str> = old_schema
        .properties
        .keys()
        .chain(new_schema.properties.keys())
        .map(String::as_str)
        .collect();

    for field in fields {
        match (
            old_schema.properties.get(field),
            new_schema.properties.get(field),
        ) {
            (Some(_), None) => {
                report.endpoints.breaking.insert(format!(
                    "response {} field {} has been removed",
                    code, field
                ));
            }
            (None, Some(_)) => {
                report.endpoints.updated.insert(format!(
                    "response {} field {} has been added",
                    code, field
                ));
            }
            (Some(old_type), Some(new_type)) if old_type != new_type => {
                report.endpoints.breaking.insert(format!(
                    "response {} field {} changes from {} to {}",
                    code, field, old_type, new_type
                ));
            }
            _ => {}
        }
    }

    for field in new_schema.required.difference(&old_schema.required) {
        report.endpoints.breaking.insert(format!(
            "response {} field {} is now required",
            code, field
        ));
    }
}

/// Reconciles named model schemas across both documents.
pub fn diff_models(
    old_models: &IndexMap<String, Schema>,
    new_models: &IndexMap<String, Schema>,
) -> DiffReport {
    let mut report = DiffReport::new();
    for name in key_union(old_models, new_models) {
        match (old_models.get(name), new_models.get(name)) {
            (Some(_), None) => {
                report.models.removed.insert(name.to_string());
            }
            (None, Some(_)) => {
                report.models.added.insert(name.to_string());
            }
            (Some(old_model), Some(new_model)) => {
                diff_model(name, old_model, new_model, &mut report);
            }
            (None, None) => unreachable!("key came from the union"),
        }
    }
    report
}

/// Compares two versions of one named model.
///
/// Findings are recorded against the model name.  Adding a required
/// property breaks producers that do not yet populate it; removing or
/// retyping an existing property breaks consumers.  Optional property churn
/// is an update.
fn diff_model(
    name: &str,
    old_model: &Schema,
    new_model: &Schema,
    report: &mut DiffReport,
) {
    let mut breaking =
        new_model.required.difference(&old_model.required).next().is_some();
    let mut updated = false;

    let fields: BTreeSet<&str> = old_model
        .properties
        .keys()
        .chain(new_model.properties.keys())
        .map(String::as_str)
        .collect();

    for field in fields {
        match (old_model.properties.get(field), new_model.properties.get(field))
        {
            (Some(_), None) => {
                if old_model.required.contains(field) {
                    breaking = true;
                } else {
                    updated = true;
                }
            }
            (None, Some(_)) => {
                // A newly-required property is already covered by the
                // required-set difference above.
                if !new_model.required.contains(field) {
                    updated = true;
                }
            }
            (Some(old_type), Some(new_type)) if old_type != new_type => {
                breaking = true;
            }
            _ => {}
        }
    }

    if breaking {
        report.models.breaking.insert(name.to_string());
    }
    if updated {
        report.models.updated.insert(name.to_string());
    }
}
