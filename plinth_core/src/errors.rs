//! # Error Types
//!
//! Structured error types for plinth_core. Input problems fail a design call
//! outright; sub-check and report problems are carried inside the result
//! instead (see [`crate::calculations::SubCheck`]).
//!
//! ## Example
//!
//! ```rust
//! use plinth_core::errors::{CalcError, CalcResult};
//!
//! fn validate_soil(soil_allow_kn_per_m2: f64) -> CalcResult<()> {
//!     if soil_allow_kn_per_m2 <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "soil_allow_kn_per_m2",
//!             soil_allow_kn_per_m2.to_string(),
//!             "Allowable soil pressure must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for plinth_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A punching, serviceability or takeoff sub-check could not be evaluated
    #[error("{check} check failed: {reason}")]
    SubcheckFailed { check: String, reason: String },

    /// Report artifacts could not be written
    #[error("Report write failed for '{path}': {reason}")]
    ReportWriteFailed { path: String, reason: String },

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

    /// Create a SubcheckFailed error
    pub fn subcheck_failed(check: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::SubcheckFailed {
            check: check.into(),
            reason: reason.into(),
        }
    }

    /// Create a ReportWriteFailed error
    pub fn report_write_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ReportWriteFailed {
            path: path.into(),
            reason: reason.into(),
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

    /// True when the caller sent bad data (maps to a 4xx at the HTTP layer)
    pub fn is_client_error(&self) -> bool {
        matches!(self, CalcError::InvalidInput { .. } | CalcError::MissingField { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::SubcheckFailed { .. } => "SUBCHECK_FAILED",
            CalcError::ReportWriteFailed { .. } => "REPORT_WRITE_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

/// Reject NaN and infinities before they leak into a result record.
pub(crate) fn ensure_finite(field: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "Value must be a finite number"))
    }
}

/// Require a strictly positive, finite value.
pub(crate) fn ensure_positive(field: &str, value: f64, reason: &str) -> CalcResult<f64> {
    let value = ensure_finite(field, value)?;
    if value <= 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), reason));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("soil_allow_kn_per_m2", "-5", "Soil pressure must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("p1_kn").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::subcheck_failed("punching", "nan").error_code(), "SUBCHECK_FAILED");
        assert_eq!(CalcError::report_write_failed("/tmp", "denied").error_code(), "REPORT_WRITE_FAILED");
    }

    #[test]
    fn test_client_errors() {
        assert!(CalcError::missing_field("p2_kn").is_client_error());
        assert!(CalcError::invalid_input("pu_kn", "0", "x").is_client_error());
        assert!(!CalcError::Internal { message: "boom".into() }.is_client_error());
    }

    #[test]
    fn test_ensure_helpers() {
        assert!(ensure_finite("x", f64::NAN).is_err());
        assert!(ensure_positive("x", 0.0, "must be positive").is_err());
        assert_eq!(ensure_positive("x", 2.5, "must be positive").unwrap(), 2.5);
    }
}
