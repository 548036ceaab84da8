// Copyright 2025 Oxide Computer Company

//! Conversion from the `openapiv3` object model
//!
//! Callers that already hold a parsed [`openapiv3::OpenAPI`] can diff it
//! without a round trip through JSON.  Unresolvable `$ref` parameters and
//! path items are skipped; `$ref` schemas label as the referenced name, the
//! same normalization the JSON boundary applies.

use crate::from_value::reference_name;
use crate::spec::Method;
use crate::spec::Operation;
use crate::spec::Parameter;
use crate::spec::ParameterLocation;
use crate::spec::PathItem;
use crate::spec::Response;
use crate::spec::Schema;
use crate::spec::SchemaType;
use crate::spec::SpecDocument;
use openapiv3::ReferenceOr;

impl From<&openapiv3::OpenAPI> for SpecDocument {
    fn from(document: &openapiv3::OpenAPI) -> SpecDocument {
        let mut spec = SpecDocument::default();

        if let Some(components) = &document.components {
            for (name, schema) in &components.schemas {
                spec.definitions.insert(name.clone(), schema_shape(schema));
            }
        }

        for (path, item) in &document.paths.paths {
            let ReferenceOr::Item(item) = item else {
                continue;
            };
            spec.paths.insert(path.clone(), convert_path_item(item));
        }

        spec
    }
}

fn convert_path_item(item: &openapiv3::PathItem) -> PathItem {
    let methods = [
        (Method::Get, &item.get),
        (Method::Put, &item.put),
        (Method::Post, &item.post),
        (Method::Delete, &item.delete),
        (Method::Options, &item.options),
        (Method::Head, &item.head),
        (Method::Patch, &item.patch),
        (Method::Trace, &item.trace),
    ];

    let mut path_item = PathItem::default();
    for (method, operation) in methods {
        if let Some(operation) = operation {
            path_item.operations.insert(method, convert_operation(operation));
        }
    }
    path_item
}

fn convert_operation(operation: &openapiv3::Operation) -> Operation {
    let mut op =
        Operation { deprecated: operation.deprecated, ..Default::default() };

    for parameter in &operation.parameters {
        let ReferenceOr::Item(parameter) = parameter else {
            // Resolving would require the containing document; the JSON
            // boundary skips these too.
            continue;
        };
        op.parameters.push(convert_parameter(parameter));
    }

    if let Some(default) = &operation.responses.default {
        op.responses.insert("default".to_string(), convert_response(default));
    }
    for (code, response) in &operation.responses.responses {
        op.responses.insert(code.to_string(), convert_response(response));
    }

    op
}

fn convert_parameter(parameter: &openapiv3::Parameter) -> Parameter {
    let (data, location) = match parameter {
        openapiv3::Parameter::Query { parameter_data, .. } => {
            (parameter_data, ParameterLocation::Query)
        }
        openapiv3::Parameter::Header { parameter_data, .. } => {
            (parameter_data, ParameterLocation::Header)
        }
        openapiv3::Parameter::Path { parameter_data, .. } => {
            (parameter_data, ParameterLocation::Path)
        }
        openapiv3::Parameter::Cookie { parameter_data, .. } => {
            (parameter_data, ParameterLocation::Cookie)
        }
    };

    let schema = match &data.format {
        openapiv3::ParameterSchemaOrContent::Schema(schema) => {
            type_label(schema)
        }
        openapiv3::ParameterSchemaOrContent::Content(_) => SchemaType::any(),
    };

    Parameter {
        name: data.name.clone(),
        location,
        required: data.required,
        schema,
    }
}

fn convert_response(response: &ReferenceOr<openapiv3::Response>) -> Response {
    match response {
        ReferenceOr::Reference { reference } => Response {
            schema: Some(Schema {
                type_label: SchemaType::from(reference_name(reference)),
                ..Default::default()
            }),
        },
        ReferenceOr::Item(response) => {
            let media = response
                .content
                .get("application/json")
                .or_else(|| response.content.values().next());
            Response {
                schema: media
                    .and_then(|media| media.schema.as_ref())
                    .map(schema_shape),
            }
        }
    }
}

fn schema_shape(schema: &ReferenceOr<openapiv3::Schema>) -> Schema {
    match schema {
        ReferenceOr::Reference { reference } => Schema {
            type_label: SchemaType::from(reference_name(reference)),
            ..Default::default()
        },
        ReferenceOr::Item(item) => {
            let mut shape = Schema {
                type_label: kind_label(&item.schema_kind),
                ..Default::default()
            };
            if let openapiv3::SchemaKind::Type(openapiv3::Type::Object(
                object,
            )) = &item.schema_kind
            {
                for (name, property) in &object.properties {
                    shape
                        .properties
                        .insert(name.clone(), boxed_type_label(property));
                }
                shape.required.extend(object.required.iter().cloned());
            }
            shape
        }
    }
}

fn type_label(schema: &ReferenceOr<openapiv3::Schema>) -> SchemaType {
    match schema {
        ReferenceOr::Reference { reference } => {
            SchemaType::from(reference_name(reference))
        }
        ReferenceOr::Item(item) => kind_label(&item.schema_kind),
    }
}

fn boxed_type_label(
    schema: &ReferenceOr<Box<openapiv3::Schema>>,
) -> SchemaType {
    match schema {
        ReferenceOr::Reference { reference } => {
            SchemaType::from(reference_name(reference))
        }
        ReferenceOr::Item(item) => kind_label(&item.schema_kind),
    }
}

fn kind_label(kind: &openapiv3::SchemaKind) -> SchemaType {
    match kind {
        openapiv3::SchemaKind::Type(openapiv3::Type::String(_)) => {
            SchemaType::from("string")
        }
        openapiv3::SchemaKind::Type(openapiv3::Type::Number(_)) => {
            SchemaType::from("number")
        }
        openapiv3::SchemaKind::Type(openapiv3::Type::Integer(_)) => {
            SchemaType::from("integer")
        }
        openapiv3::SchemaKind::Type(openapiv3::Type::Boolean(_)) => {
            SchemaType::from("boolean")
        }
        openapiv3::SchemaKind::Type(openapiv3::Type::Object(_)) => {
            SchemaType::from("object")
        }
        openapiv3::SchemaKind::Type(openapiv3::Type::Array(array)) => {
            let item = array
                .items
                .as_ref()
                .map(boxed_type_label)
                .unwrap_or_else(SchemaType::any);
            SchemaType::array_of(&item)
        }
        openapiv3::SchemaKind::OneOf { .. } => SchemaType::from("oneOf"),
        openapiv3::SchemaKind::AllOf { .. } => SchemaType::from("allOf"),
        openapiv3::SchemaKind::AnyOf { .. } => SchemaType::from("anyOf"),
        openapiv3::SchemaKind::Not { .. } => SchemaType::from("not"),
        openapiv3::SchemaKind::Any(_) => SchemaType::any(),
    }
}
