//! # CLI Error Type
//!
//! Unified error type for the `facture` binary.
//!
//! Input problems (a bad row, a missing rate) are reported with the field
//! and row they concern. Loading problems (unreadable file, malformed JSON,
//! bad environment) are reported as a single generic message.

use serde::Serialize;

use facture_core::{CoreError, ValidationError};

use crate::config::ConfigError;

/// Top-level error.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    ConfigError,
    InputError,
}

/// Serializable error report printed in `--json` mode.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl CliError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CliError::Core(_) | CliError::Validation(_) => ErrorCode::ValidationError,
            CliError::Config(_) => ErrorCode::ConfigError,
            CliError::Io(_) | CliError::Json(_) => ErrorCode::InputError,
        }
    }

    /// Process exit status: 2 for input the user can fix inline, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self.code() {
            ErrorCode::ValidationError => 2,
            _ => 1,
        }
    }

    pub fn report(&self) -> ErrorReport {
        let (field, line) = match self {
            CliError::Core(CoreError::InvalidLine { index, source }) => {
                (Some(source.field().to_string()), Some(*index))
            }
            CliError::Core(CoreError::Validation(e)) | CliError::Validation(e) => {
                (Some(e.field().to_string()), None)
            }
            _ => (None, None),
        };

        ErrorReport {
            code: self.code(),
            message: self.to_string(),
            field,
            line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_line_report() {
        let err = CliError::from(CoreError::InvalidLine {
            index: 3,
            source: ValidationError::Required {
                field: "taxRatePercent".to_string(),
            },
        });

        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.exit_code(), 2);

        let report = err.report();
        assert_eq!(report.field.as_deref(), Some("taxRatePercent"));
        assert_eq!(report.line, Some(3));
        assert_eq!(report.message, "Line 3: taxRatePercent is required");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn test_loading_errors_are_generic() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CliError::from(json_err);

        assert_eq!(err.code(), ErrorCode::InputError);
        assert_eq!(err.exit_code(), 1);

        let report = serde_json::to_value(err.report()).unwrap();
        assert!(report.get("field").is_none());
        assert!(report.get("line").is_none());
    }
}
