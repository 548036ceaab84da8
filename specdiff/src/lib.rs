// Copyright 2025 Oxide Computer Company

//! Specdiff is a semantic diff engine for API specification documents
//! (Swagger v2 / OpenAPI v3).  Given two versions of a specification -- the
//! one existing clients were written against and a proposed replacement --
//! it classifies every endpoint, method, parameter, response, and model
//! change as added, removed, deprecated, breaking, or updated, and returns
//! the classification as structured data.
//!
//! The engine is deliberately boring to operate: it is synchronous, makes no
//! I/O, keeps no state between invocations, and cannot fail once its inputs
//! have been normalized.  Concurrent callers may diff different document
//! pairs in parallel with no coordination.
//!
//! ## Usage
//!
//! Documents come in through one of two boundaries: loose JSON (tolerant of
//! both the v2 and v3 root shapes) or a typed [`openapiv3::OpenAPI`] value.
//!
//! ```
//! use serde_json::json;
//! use specdiff::diff_specs;
//! use specdiff::SpecDocument;
//!
//! let old = SpecDocument::from_json(&json!({
//!     "paths": { "/users": { "get": {} } }
//! }))?;
//! let new = SpecDocument::from_json(&json!({
//!     "paths": { "/users": { "get": {}, "post": {} } }
//! }))?;
//!
//! let log = slog::Logger::root(slog::Discard, slog::o!());
//! let report = diff_specs(&log, &old, &new);
//! assert!(report.endpoints.added.contains("[/users] POST added"));
//! # Ok::<(), specdiff::InvalidDocument>(())
//! ```
//!
//! The [`DiffReport`] serializes to JSON with stable ordering, so its output
//! is suitable for golden-file comparison and for rendering by external
//! tools.
//!
//! ## What counts as breaking
//!
//! The rules lean conservative: anything that narrows the contract a
//! consumer or producer may already rely on is classified breaking -- a
//! removed method or response, a parameter or response field changing type,
//! a new required parameter or model property, a previously-required
//! property disappearing.  Pure widening (a new optional parameter, a new
//! optional model property) is merely added/updated.

mod diff;
mod error;
mod from_value;
mod logging;
mod openapi;
mod report;
mod spec;

pub use diff::diff_endpoints;
pub use diff::diff_models;
pub use diff::diff_operations;
pub use diff::diff_parameters;
pub use diff::diff_responses;
pub use diff::diff_specs;
pub use error::InvalidDocument;
pub use logging::ConfigLogging;
pub use logging::ConfigLoggingIfExists;
pub use logging::ConfigLoggingLevel;
pub use report::format_label;
pub use report::DiffReport;
pub use report::EndpointFindings;
pub use report::ModelFindings;
pub use spec::Method;
pub use spec::Operation;
pub use spec::Parameter;
pub use spec::ParameterLocation;
pub use spec::PathItem;
pub use spec::Response;
pub use spec::Schema;
pub use spec::SchemaType;
pub use spec::SpecDocument;

#[macro_use]
extern crate slog;
