//! Error types for loading and building locale tables.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing or editing a single locale table.
#[derive(Debug, Error)]
pub enum TableError {
    /// A key path (or one of its segments) is malformed.
    #[error("invalid key path '{path}': {reason}")]
    InvalidKeyPath { path: String, reason: &'static str },

    /// A leaf holds something other than a string.
    #[error("locale '{locale}': value at '{path}' must be a string, found {found}")]
    NonStringValue {
        locale: String,
        path: String,
        found: &'static str,
    },

    /// The document root (or the `translation` namespace) is not an object.
    #[error("locale '{locale}': expected a JSON object at the root")]
    NotAnObject { locale: String },

    /// An insert would overwrite a section with a leaf or descend through a leaf.
    #[error("key path '{path}' conflicts with an existing {existing}")]
    PathConflict {
        path: String,
        existing: &'static str,
    },

    /// Malformed JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while assembling a catalog of locale tables.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The configured reference locale has no table.
    #[error("reference locale '{0}' has no table")]
    MissingReference(String),

    /// A locale directory or file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A locale file failed to parse.
    #[error("failed to parse {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    /// An embedded table failed to parse.
    #[error("bundled locale '{locale}' is invalid: {source}")]
    Bundled {
        locale: String,
        #[source]
        source: TableError,
    },
}
