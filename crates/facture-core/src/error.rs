//! # Error Types
//!
//! Domain-specific error types for facture-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  facture-core errors (this file)                                       │
//! │  ├── ValidationError  - Field-level input failures                     │
//! │  └── CoreError        - Document rule violations                       │
//! │                                                                         │
//! │  facture-cli errors (separate crate)                                   │
//! │  ├── ConfigError      - Bad environment values                         │
//! │  └── CliError         - What the user sees                             │
//! │                                                                         │
//! │  The engine in `money` has no error type: it cannot fail.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the field name, spelled as the payload key, so forms can flag
//!    the right input
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Document-level errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No line with this id exists on the document.
    #[error("Line not found: {0}")]
    LineNotFound(String),

    /// Two lines of a stored document share an id.
    #[error("Duplicate line id: {0}")]
    DuplicateLineId(String),

    /// Document has reached its maximum number of lines.
    #[error("Document cannot have more than {max} lines")]
    DocumentTooLarge { max: usize },

    /// A row of an incoming payload failed validation.
    ///
    /// `index` is zero-based so the caller can highlight the row.
    #[error("Line {index}: {source}")]
    InvalidLine {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the boundary, before any value reaches the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing, null, or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value could not be read as the expected type.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Value is below zero.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotFinite { field }
            | ValidationError::Negative { field }
            | ValidationError::OutOfRange { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DocumentTooLarge { max: 500 };
        assert_eq!(err.to_string(), "Document cannot have more than 500 lines");

        let err = CoreError::InvalidLine {
            index: 2,
            source: ValidationError::Negative {
                field: "quantity".to_string(),
            },
        };
        assert_eq!(err.to_string(), "Line 2: quantity must not be negative");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "taxRatePercent".to_string(),
        };
        assert_eq!(err.to_string(), "taxRatePercent is required");

        let err = ValidationError::OutOfRange {
            field: "taxRatePercent".to_string(),
            min: 0.0,
            max: 100.0,
        };
        assert_eq!(err.to_string(), "taxRatePercent must be between 0 and 100");
        assert_eq!(err.field(), "taxRatePercent");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "designation".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
