//! Collection error types.

use std::path::PathBuf;

use folio_core::CollectionKind;
use thiserror::Error;

use crate::registry::EntryIssue;

/// Result type for collection operations.
pub type Result<T> = std::result::Result<T, CollectionError>;

/// Errors raised while loading, querying or generating a registry.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Core error (config, entry data).
    #[error(transparent)]
    Core(#[from] folio_core::CoreError),

    /// Parser error.
    #[error("parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// No collection with this name.
    #[error("unknown collection `{0}`")]
    UnknownCollection(String),

    /// Accessor used on a collection of the other kind.
    #[error("collection `{collection}` is a {actual} collection, expected {expected}")]
    WrongKind {
        collection: String,
        expected: CollectionKind,
        actual: CollectionKind,
    },

    /// Batch lookup mixing collections.
    #[error("references must all name `{expected}`, found `{found}`")]
    MixedReferences { expected: String, found: String },

    /// Two files map to the same slug.
    #[error("duplicate slug `{slug}` in `{collection}`: {first} and {second}")]
    DuplicateSlug {
        collection: String,
        slug: String,
        first: String,
        second: String,
    },

    /// Field is not declared as a reference in the collection schema.
    #[error("`{field}` is not a reference field of `{collection}`")]
    NotAReference { collection: String, field: String },

    /// Entries failed schema validation.
    #[error("{} entries failed validation:\n{}", .issues.len(), format_issues(.issues))]
    Invalid { issues: Vec<EntryIssue> },
}

fn format_issues(issues: &[EntryIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  {issue}"))
        .collect::<Vec<_>>()
        .join("\n")
}
