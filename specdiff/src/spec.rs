// Copyright 2025 Oxide Computer Company

//! Typed model for API specification documents
//!
//! The comparators never probe raw JSON.  Input documents are normalized
//! once at the boundary (see [`crate::from_value`] and [`crate::openapi`])
//! into the types here, which carry exactly the information the diff engine
//! compares and nothing else.

use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

/// A parsed API specification document, reduced to the parts the diff engine
/// compares: named model schemas and the path → method → operation tree.
///
/// Collections preserve document order.  The comparators do not rely on that
/// order; every reconciliation walks a sorted union of the keys on both
/// sides, so output is deterministic regardless of how a document was
/// written.
#[derive(Clone, Debug, Default)]
pub struct SpecDocument {
    /// Named model schemas (`definitions` in Swagger v2, `components.schemas`
    /// in OpenAPI v3)
    pub definitions: IndexMap<String, Schema>,
    /// Path template (e.g. `/users/{id}`) to the operations under it
    pub paths: IndexMap<String, PathItem>,
}

/// The operations defined under one path template, keyed by HTTP method.
#[derive(Clone, Debug, Default)]
pub struct PathItem {
    pub operations: BTreeMap<Method, Operation>,
}

/// HTTP methods that may appear in a path item.
///
/// This is a closed set.  Keys of a path item that do not name a method
/// (`summary`, path-level `parameters`, `x-*` extensions) are not operations
/// and are skipped by the adapters.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl Method {
    /// Parses a lowercase path-item key, returning `None` for keys that do
    /// not name a method.
    pub fn from_key(key: &str) -> Option<Method> {
        match key {
            "get" => Some(Method::Get),
            "put" => Some(Method::Put),
            "post" => Some(Method::Post),
            "delete" => Some(Method::Delete),
            "options" => Some(Method::Options),
            "head" => Some(Method::Head),
            "patch" => Some(Method::Patch),
            "trace" => Some(Method::Trace),
            _ => None,
        }
    }

    /// The uppercase name, as it appears in finding messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Head => "HEAD",
            Method::Patch => "PATCH",
            Method::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One HTTP method handler under one path template.
#[derive(Clone, Debug, Default)]
pub struct Operation {
    /// Parameters in document order
    pub parameters: Vec<Parameter>,
    /// Marked for future removal but still functional
    pub deprecated: bool,
    /// Response status code (`"200"`, `"default"`, `"4XX"`) to response
    pub responses: IndexMap<String, Response>,
}

/// A single request parameter.
///
/// Within one operation, parameters are identified by the (name, location)
/// pair.  Two parameters may share a name as long as they are carried in
/// different locations.
#[derive(Clone, Debug)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: SchemaType,
}

/// Where a parameter is carried in a request.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    /// Parses the `in` member of a parameter object.
    pub fn from_key(key: &str) -> Option<ParameterLocation> {
        match key {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in an operation's response map.
#[derive(Clone, Debug, Default)]
pub struct Response {
    /// Body schema, if the response documents one
    pub schema: Option<Schema>,
}

/// Normalized label for a declared type: a primitive name (`string`,
/// `integer`), an array form (`array[string]`), the referenced model name
/// for `$ref` schemas (`User`), or `any` when the input declares nothing.
///
/// Two declared types are considered equal iff their labels are equal.  The
/// label is also what finding messages print ("changes from `string` to
/// `integer`").
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct SchemaType(String);

impl SchemaType {
    /// Label used when the input declares no type at all.
    pub fn any() -> SchemaType {
        SchemaType::from("any")
    }

    /// Label for an array with the given item type.
    pub fn array_of(item: &SchemaType) -> SchemaType {
        SchemaType(format!("array[{}]", item.0))
    }
}

impl Default for SchemaType {
    fn default() -> SchemaType {
        SchemaType::any()
    }
}

impl From<String> for SchemaType {
    fn from(label: String) -> Self {
        SchemaType(label)
    }
}

impl From<&str> for SchemaType {
    fn from(label: &str) -> Self {
        SchemaType(label.to_string())
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Schema shape shared by named models and response bodies: a type label,
/// property types, and the set of required property names.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    pub type_label: SchemaType,
    /// Property name to declared type, in document order
    pub properties: IndexMap<String, SchemaType>,
    /// Property names that must be present in every valid value
    pub required: BTreeSet<String>,
}
