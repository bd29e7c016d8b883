//! Error types for stencil operations.
//!
//! Every renderer error is fatal to the call that raised it: the walk stops at
//! the point of detection and the error travels up unchanged. A tree whose
//! render failed is left partially mutated and should be discarded.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading, selecting or rendering.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Document does not seem to be a valid asset or (X)HTML file: {0}")]
    InvalidAsset(String),

    #[error("File \"{}\" not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("File \"{}\" is not a file", .0.display())]
    NotAFile(PathBuf),

    #[error("File \"{}\" can not be read", .0.display())]
    NotReadable(PathBuf),

    #[error("Invalid selector expression \"{0}\"")]
    InvalidSelector(String),

    #[error("Duplicate id \"{0}\" in document detected - bailing out")]
    DuplicateId(String),

    #[error("Cannot remove root element")]
    RemoveRoot,

    #[error("Cannot render multiple copies of root element")]
    MultiplyRoot,

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error("Form data: {0}")]
    FormData(String),
}

/// Misuse of a [`SnapshotList`](crate::dom::SnapshotList).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("No more nodes in snapshot list")]
    Exhausted,

    #[error("Node not found in snapshot list")]
    NotFound,
}

/// A view model could not be bound to the markup.
///
/// `path` is the dotted chain of `property` names from the root model to the
/// failing binding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    #[error("Trying to add \"{property}\" failed - non object ({kind}) on stack: {path}")]
    NotAnObject {
        property: String,
        kind: &'static str,
        path: String,
    },

    #[error("View model operation missing: {path}")]
    MissingAccessor { path: String },

    #[error("Unsupported type {kind} at {path}")]
    UnsupportedType { kind: &'static str, path: String },

    #[error("Sequence at {path} cannot report its count")]
    NotCountable { path: String },

    #[error("No type tag on model at {path} but current context is conditional")]
    MissingTypeTag { path: String },

    #[error("Context for type '{type_tag}' not found")]
    ContextNotFound { type_tag: String },

    #[error(
        "Attribute value must be string or boolean false - type {kind} received for \"{attribute}\" at {path}"
    )]
    InvalidAttributeValue {
        attribute: String,
        kind: &'static str,
        path: String,
    },

    #[error("Text value must be string or null - type {kind} received at {path}")]
    InvalidTextValue { kind: &'static str, path: String },
}

pub type Result<T> = std::result::Result<T, Error>;
