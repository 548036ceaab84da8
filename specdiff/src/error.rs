// Copyright 2025 Oxide Computer Company

//! Error types for input normalization
//!
//! The diff computation itself is total: once two [`crate::SpecDocument`]
//! values exist, comparing them cannot fail.  The only failure modes live at
//! the boundary, where a JSON document's top-level structure rules it out as
//! an API specification.

use thiserror::Error;

/// A document's top-level structure is not that of an API specification.
///
/// Missing collections are not errors -- a specification with no paths and
/// no models is valid and diffs to an empty report.  These fire only when a
/// value that must be a JSON object is something else.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum InvalidDocument {
    /// The document root itself is not an object.
    #[error("specification document root is not an object")]
    RootNotObject,

    /// A top-level collection, path item, or operation is present but is not
    /// an object.
    #[error("`{key}` is not an object")]
    NotAnObject { key: String },
}

impl InvalidDocument {
    pub(crate) fn not_an_object(key: impl Into<String>) -> InvalidDocument {
        InvalidDocument::NotAnObject { key: key.into() }
    }
}
