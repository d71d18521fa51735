use std::path::PathBuf;

use thiserror::Error;

use crate::json::ParseError;

/// Errors that abort a whole-document load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The named source does not exist
    #[error("source not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The top-level value has the wrong shape for this document
    #[error("unexpected document shape: {0}")]
    Schema(String),
    /// Malformed JSON text
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Catalog directory could not be turned into a file pattern
    #[error("invalid catalog pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A sub-field of an otherwise valid document that could not be used.
///
/// Never leaves the mappers: the field is logged and treated as absent.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("field '{0}' is missing")]
    Missing(&'static str),
    #[error("field '{field}' should be {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("field '{field}' has unusable value {value}")]
    Invalid { field: &'static str, value: String },
}
