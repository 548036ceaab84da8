// Copyright 2025 Oxide Computer Company

//! Normalizes loosely-shaped JSON specification documents
//!
//! This is the schema-version-tolerant boundary: it accepts either root
//! shape -- Swagger v2 (`definitions`) or OpenAPI v3 (`components.schemas`)
//! -- and reduces it to the typed model in [`crate::spec`].  Only the
//! top-level structure is validated strictly; loose shapes further down
//! degrade to `any` type labels rather than failing the document.

use crate::error::InvalidDocument;
use crate::spec::Method;
use crate::spec::Operation;
use crate::spec::Parameter;
use crate::spec::ParameterLocation;
use crate::spec::PathItem;
use crate::spec::Response;
use crate::spec::Schema;
use crate::spec::SchemaType;
use crate::spec::SpecDocument;
use serde_json::Map;
use serde_json::Value;

impl SpecDocument {
    /// Builds a [`SpecDocument`] from a parsed JSON document.
    ///
    /// Missing `paths` / `definitions` / `components.schemas` collections
    /// are treated as empty -- a document with no paths and no models is
    /// valid.  A root, collection, path item, or operation that is present
    /// but not an object fails with [`InvalidDocument`].
    pub fn from_json(document: &Value) -> Result<SpecDocument, InvalidDocument> {
        let root =
            document.as_object().ok_or(InvalidDocument::RootNotObject)?;

        let mut spec = SpecDocument::default();

        if let Some(definitions) = model_collection(root)? {
            for (name, value) in definitions {
                spec.definitions.insert(name.clone(), schema_from_json(value));
            }
        }

        if let Some(paths) = object_member(root, "paths")? {
            for (path, item_value) in paths {
                let item = item_value.as_object().ok_or_else(|| {
                    InvalidDocument::not_an_object(format!("paths.{}", path))
                })?;
                spec.paths
                    .insert(path.clone(), path_item_from_json(path, item)?);
            }
        }

        Ok(spec)
    }
}

/// Finds the model collection under either spelling: `definitions` (Swagger
/// v2) or `components.schemas` (OpenAPI v3).
fn model_collection<'a>(
    root: &'a Map<String, Value>,
) -> Result<Option<&'a Map<String, Value>>, InvalidDocument> {
    if let Some(definitions) = object_member(root, "definitions")? {
        return Ok(Some(definitions));
    }
    match object_member(root, "components")? {
        Some(components) => object_member(components, "components.schemas"),
        None => Ok(None),
    }
}

/// Looks up `key` (the last dotted segment) in `parent`, requiring it to be
/// an object if present.
fn object_member<'a>(
    parent: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, InvalidDocument> {
    let member = key.rsplit('.').next().unwrap_or(key);
    match parent.get(member) {
        None => Ok(None),
        Some(value) => value
            .as_object()
            .map(Some)
            .ok_or_else(|| InvalidDocument::not_an_object(key)),
    }
}

fn path_item_from_json(
    path: &str,
    item: &Map<String, Value>,
) -> Result<PathItem, InvalidDocument> {
    let mut path_item = PathItem::default();
    for (key, value) in item {
        // Path items also carry `summary`, shared `parameters`, and `x-*`
        // extensions; only method keys name operations.
        let Some(method) = Method::from_key(key) else {
            continue;
        };
        let operation = value.as_object().ok_or_else(|| {
            InvalidDocument::not_an_object(format!("paths.{}.{}", path, key))
        })?;
        path_item.operations.insert(method, operation_from_json(operation));
    }
    Ok(path_item)
}

fn operation_from_json(operation: &Map<String, Value>) -> Operation {
    let deprecated = operation
        .get("deprecated")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut op = Operation { deprecated, ..Default::default() };

    if let Some(parameters) =
        operation.get("parameters").and_then(Value::as_array)
    {
        op.parameters
            .extend(parameters.iter().filter_map(parameter_from_json));
    }

    if let Some(responses) =
        operation.get("responses").and_then(Value::as_object)
    {
        for (code, value) in responses {
            op.responses.insert(
                code.clone(),
                Response { schema: response_schema_from_json(value) },
            );
        }
    }

    op
}

/// Reads one entry of a `parameters` array.
///
/// Entries without a usable (name, in) pair -- including v2 `body` and
/// `formData` parameters and unresolved `$ref`s -- are skipped; their
/// contract is covered by the model and response comparisons.
fn parameter_from_json(value: &Value) -> Option<Parameter> {
    let name = value.get("name")?.as_str()?;
    let location = ParameterLocation::from_key(value.get("in")?.as_str()?)?;
    let required =
        value.get("required").and_then(Value::as_bool).unwrap_or(false);

    // v2 declares the type inline on the parameter; v3 nests it under
    // `schema`.
    let schema = match value.get("schema") {
        Some(schema) => type_label_from_json(schema),
        None => type_label_from_json(value),
    };

    Some(Parameter { name: name.to_string(), location, required, schema })
}

/// Derives a comparable type label from a schema (or v2 inline parameter):
/// `$ref` schemas label as the referenced name, arrays as `array[<item>]`,
/// everything else as its `type`, falling back to `any`.
fn type_label_from_json(value: &Value) -> SchemaType {
    if let Some(reference) = value.get("$ref").and_then(Value::as_str) {
        return SchemaType::from(reference_name(reference));
    }
    match value.get("type").and_then(Value::as_str) {
        Some("array") => {
            let item = value
                .get("items")
                .map(type_label_from_json)
                .unwrap_or_else(SchemaType::any);
            SchemaType::array_of(&item)
        }
        Some(label) => SchemaType::from(label),
        None => SchemaType::any(),
    }
}

/// `#/definitions/User` and `#/components/schemas/User` both label as
/// `User`.
pub(crate) fn reference_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

fn schema_from_json(value: &Value) -> Schema {
    let mut schema =
        Schema { type_label: type_label_from_json(value), ..Default::default() };

    if let Some(properties) = value.get("properties").and_then(Value::as_object)
    {
        for (name, property) in properties {
            schema
                .properties
                .insert(name.clone(), type_label_from_json(property));
        }
    }

    match value.get("required") {
        Some(Value::Array(names)) => {
            schema.required.extend(
                names.iter().filter_map(Value::as_str).map(str::to_string),
            );
        }
        // Some generators emit `required` as a map of property names; take
        // the keys, as the array form takes the names.
        Some(Value::Object(map)) => {
            schema.required.extend(map.keys().cloned());
        }
        _ => {}
    }

    schema
}

/// v2 puts a response body schema at `schema`; v3 nests it under
/// `content.<media-type>.schema`.  JSON media is preferred; otherwise the
/// first media type wins.
fn response_schema_from_json(value: &Value) -> Option<Schema> {
    if let Some(schema) = value.get("schema") {
        return Some(schema_from_json(schema));
    }
    let content = value.get("content")?.as_object()?;
    let media =
        content.get("application/json").or_else(|| content.values().next())?;
    Some(schema_from_json(media.get("schema")?))
}
