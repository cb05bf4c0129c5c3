//! Error types for form schema preparation and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading or transforming schemas and values.
#[derive(Debug, Error)]
pub enum FormError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    // Schema errors (exit code 2)
    #[error("required property \"{name}\" at {path} has no entry in properties")]
    UnknownRequiredProperty { path: String, name: String },

    #[error("value \"{key}\" holds a placeholder but the schema has no such property")]
    MissingSchemaProperty { key: String },

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },
}

impl FormError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            FormError::FileNotFound { .. } | FormError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors during form value validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("validation failed with {} error(s)", errors.len())]
    Invalid { errors: Vec<FieldError> },
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Form(e) => e.exit_code(),
            ValidateError::Invalid { .. } => 1,
        }
    }
}

/// Single validation error with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FieldError {
    /// JSON Pointer to the invalid field.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
