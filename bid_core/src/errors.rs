//! # Error Types
//!
//! Structured error types for bid_core. Every fatal condition carries enough
//! context (which field, which identifier, which file) for the caller to
//! correct its input and retry by hand.
//!
//! Unpriced requirements are deliberately absent here: a catalog without a
//! match for some category still produces a bid, and the gap is reported as
//! data on [`crate::bid::Bid::unpriced`].
//!
//! ## Example
//!
//! ```rust
//! use bid_core::errors::{CalcError, CalcResult};
//!
//! fn validate_height(height_ft: f64) -> CalcResult<()> {
//!     if height_ft <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "building_height_ft",
//!             height_ft.to_string(),
//!             "Height must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_height(-3.0).unwrap_err().is_validation_error());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for bid_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for compliance and bid operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (non-positive geometry, negative markup, ...)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required project field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Compliance standard identifier not recognized
    #[error("Unknown compliance standard: '{identifier}' (expected \"UL 96A\" or \"NFPA 780\")")]
    UnknownStandard { identifier: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Job file schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownStandard error
    pub fn unknown_standard(identifier: impl Into<String>) -> Self {
        CalcError::UnknownStandard {
            identifier: identifier.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by a malformed project or configuration.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, CalcError::InvalidInput { .. } | CalcError::MissingField { .. })
    }

    /// The offending field name, when the error is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            CalcError::InvalidInput { field, .. } | CalcError::MissingField { field } => Some(field),
            _ => None,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "VALIDATION_ERROR",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::UnknownStandard { .. } => "UNKNOWN_STANDARD",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}
