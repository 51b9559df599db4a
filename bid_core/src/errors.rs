//! # Error Types
//!
//! Structured error types for bid_core. Only two kinds of failure matter
//! to the projection calculator itself — invalid input and missing
//! prerequisite data — but the crate as a whole also persists session
//! drafts, so file and schema errors live here too.
//!
//! ## Example
//!
//! ```rust
//! use bid_core::errors::{BidError, BidResult};
//!
//! fn validate_linear_feet(linear_feet: f64) -> BidResult<()> {
//!     if linear_feet <= 0.0 {
//!         return Err(BidError::InvalidInput {
//!             field: "linear_feet".to_string(),
//!             value: linear_feet.to_string(),
//!             reason: "Fence length must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for bid_core operations
pub type BidResult<T> = Result<T, BidError>;

/// Structured error type for bid operations.
///
/// Each variant carries enough context to render a useful message at the
/// UI boundary without string-matching. The projection calculator only
/// ever produces `InvalidInput` and `MissingField`; the rest belong to
/// session persistence.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum BidError {
    /// An input value is invalid (out of range, non-finite, wrong shape)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Session draft is locked by another estimator/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Session schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BidError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        BidError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        BidError::MissingField {
            field: field.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        BidError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        BidError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry later)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BidError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            BidError::InvalidInput { .. } => "INVALID_INPUT",
            BidError::MissingField { .. } => "MISSING_FIELD",
            BidError::FileError { .. } => "FILE_ERROR",
            BidError::FileLocked { .. } => "FILE_LOCKED",
            BidError::SerializationError { .. } => "SERIALIZATION_ERROR",
            BidError::VersionMismatch { .. } => "VERSION_MISMATCH",
            BidError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
