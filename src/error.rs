//! Error types for layerconf
//!
//! Every failure the loader can report is a variant of [`Error`], so callers
//! can match broadly (`Result<T>`) or narrowly on a single variant.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for layerconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for layerconf
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Coercion Errors
    // -------------------------------------------------------------------------
    #[error("Cannot convert {raw} from '{source_label}' to {target} for '{path}'")]
    TypeCoercion {
        path: String,
        source_label: String,
        raw: String,
        target: String,
    },

    #[error("Conversion of {raw} from '{source_label}' to {target} is not supported for '{path}'")]
    UnsupportedConversion {
        path: String,
        source_label: String,
        raw: String,
        target: String,
    },

    // -------------------------------------------------------------------------
    // Schema Errors
    // -------------------------------------------------------------------------
    #[error("Field '{name}' is already declared at this level")]
    DuplicateField { name: String },

    #[error("Invalid field name '{name}': must be non-empty with no '.', '__' or whitespace")]
    InvalidFieldName { name: String },

    #[error("Missing required configuration: {}", .paths.join(", "))]
    MissingRequiredFields { paths: Vec<String> },

    // -------------------------------------------------------------------------
    // Path Errors
    // -------------------------------------------------------------------------
    #[error("Cannot set '{path}': '{segment}' holds a value that is not a table")]
    PathConflict { path: String, segment: String },

    #[error("Invalid key path: '{0}'")]
    InvalidPath(String),

    // -------------------------------------------------------------------------
    // I/O and Parse Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{label}': {message}")]
    Parse { label: String, message: String },
}

impl Error {
    /// Check if this error came from converting a raw value to a declared type
    #[must_use]
    pub fn is_coercion_error(&self) -> bool {
        matches!(
            self,
            Error::TypeCoercion { .. } | Error::UnsupportedConversion { .. }
        )
    }

    /// Check if this error is a schema declaration or completeness error
    #[must_use]
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Error::DuplicateField { .. }
                | Error::InvalidFieldName { .. }
                | Error::MissingRequiredFields { .. }
        )
    }

    /// The dot-path this error refers to, when it refers to exactly one
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::TypeCoercion { path, .. }
            | Error::UnsupportedConversion { path, .. }
            | Error::PathConflict { path, .. } => Some(path),
            Error::InvalidPath(path) => Some(path),
            _ => None,
        }
    }
}
