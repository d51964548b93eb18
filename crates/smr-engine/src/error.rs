//! Error types for the engine
//!
//! The parser never errors; invalid commands are reported through
//! [`ParsedCommand::is_valid`](crate::ParsedCommand). Transform and field
//! resolution only fail on malformed input, and compliance rejections carry
//! the human-readable reason produced by the validator.

/// Missing or malformed input to an engine operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Literal replace with nothing to find
    #[error("find text must not be empty")]
    EmptyFindText,

    /// Escaped find text too large to compile
    #[error("find text too long ({0} bytes)")]
    FindTextTooLong(usize),

    /// Field update without a field name
    #[error("field name must not be empty")]
    EmptyFieldName,

    /// Required request input missing or blank
    #[error("{0} must not be empty")]
    MissingInput(&'static str),

    /// Operation reached execution without a replacement or value
    #[error("operation {index} has no resolved value")]
    UnresolvedOperation { index: usize },

    /// Free-text command produced no operations
    #[error("no operations could be parsed from: '{0}'")]
    UnparseableCommand(String),

    /// Brand profile level outside its allowed range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl ValidationError {
    /// Create out-of-range error for a profile field
    #[inline]
    #[must_use]
    pub fn out_of_range(field: &'static str, value: i64, min: i64, max: i64) -> Self {
        Self::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }
}

/// Candidate text rejected by the brand compliance gate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("brand compliance rejected: {reason}")]
pub struct ComplianceError {
    /// Reason reported by the validator
    pub reason: String,
}

impl ComplianceError {
    /// Create compliance error with reason
    #[inline]
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Combined engine error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Compliance(#[from] ComplianceError),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        assert_eq!(
            ValidationError::EmptyFindText.to_string(),
            "find text must not be empty"
        );
        assert_eq!(
            ValidationError::MissingInput("entryId").to_string(),
            "entryId must not be empty"
        );
        let err = ValidationError::out_of_range("formality_level", 9, 1, 5);
        assert_eq!(err.to_string(), "formality_level must be between 1 and 5, got 9");
    }

    #[test]
    fn compliance_error_display() {
        let err = ComplianceError::new("too casual");
        assert_eq!(err.to_string(), "brand compliance rejected: too casual");
    }

    #[test]
    fn error_conversions() {
        let engine_err: EngineError = ValidationError::EmptyFieldName.into();
        assert!(matches!(engine_err, EngineError::Validation(_)));

        let engine_err: EngineError = ComplianceError::new("nope").into();
        assert!(matches!(engine_err, EngineError::Compliance(_)));
    }
}
