//! Typed edit operations
//!
//! Serialized as `{"type": "replace", "findText", "replaceText"}` or
//! `{"type": "field_update", "fieldName", "newValue"}`.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// A single requested edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Operation {
    /// Literal find/replace across the whole entry
    Replace {
        /// Text to find (never empty)
        find_text: String,
        /// Replacement; `None` until explicit or suggested
        #[serde(default, skip_serializing_if = "Option::is_none")]
        replace_text: Option<String>,
    },

    /// Named-field overwrite
    FieldUpdate {
        /// Requested field name (never empty)
        field_name: String,
        /// New value; `None` until explicit or suggested
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_value: Option<String>,
    },
}

impl Operation {
    /// Create replace operation with explicit replacement
    #[inline]
    #[must_use]
    pub fn replace(find_text: impl Into<String>, replace_text: impl Into<String>) -> Self {
        Self::Replace {
            find_text: find_text.into(),
            replace_text: Some(replace_text.into()),
        }
    }

    /// Create replace operation awaiting a suggestion
    #[inline]
    #[must_use]
    pub fn replace_unresolved(find_text: impl Into<String>) -> Self {
        Self::Replace {
            find_text: find_text.into(),
            replace_text: None,
        }
    }

    /// Create field update operation
    #[inline]
    #[must_use]
    pub fn field_update(field_name: impl Into<String>, new_value: impl Into<String>) -> Self {
        Self::FieldUpdate {
            field_name: field_name.into(),
            new_value: Some(new_value.into()),
        }
    }

    /// The find text or field name this operation targets
    #[inline]
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Replace { find_text, .. } => find_text,
            Self::FieldUpdate { field_name, .. } => field_name,
        }
    }

    /// The replacement text or new value, if resolved
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Replace { replace_text, .. } => replace_text.as_deref(),
            Self::FieldUpdate { new_value, .. } => new_value.as_deref(),
        }
    }

    /// Whether a value is present
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.value().is_some()
    }

    /// Fill in the value, keeping the target
    #[must_use]
    pub fn resolved_with(self, value: impl Into<String>) -> Self {
        match self {
            Self::Replace { find_text, .. } => Self::Replace {
                find_text,
                replace_text: Some(value.into()),
            },
            Self::FieldUpdate { field_name, .. } => Self::FieldUpdate {
                field_name,
                new_value: Some(value.into()),
            },
        }
    }

    /// Check the target is non-empty
    ///
    /// # Errors
    /// `EmptyFindText` / `EmptyFieldName` for blank targets
    pub fn validate_target(&self) -> Result<(), ValidationError> {
        match self {
            Self::Replace { find_text, .. } if find_text.is_empty() => {
                Err(ValidationError::EmptyFindText)
            }
            Self::FieldUpdate { field_name, .. } if field_name.trim().is_empty() => {
                Err(ValidationError::EmptyFieldName)
            }
            _ => Ok(()),
        }
    }
}

/// Result of parsing a free-text instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCommand {
    /// The instruction as given
    pub original_input: String,
    /// Extracted operations, in pattern order
    pub operations: Vec<Operation>,
    /// True iff `operations` is non-empty
    pub is_valid: bool,
}

impl ParsedCommand {
    /// Create from input and extracted operations
    #[must_use]
    pub fn new(original_input: impl Into<String>, operations: Vec<Operation>) -> Self {
        let is_valid = !operations.is_empty();
        Self {
            original_input: original_input.into(),
            operations,
            is_valid,
        }
    }

    /// Operations, or a validation error when nothing was extracted
    ///
    /// # Errors
    /// `UnparseableCommand` when the command is invalid
    pub fn into_operations(self) -> Result<Vec<Operation>, ValidationError> {
        if self.is_valid {
            Ok(self.operations)
        } else {
            Err(ValidationError::UnparseableCommand(self.original_input))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replace_wire_format() {
        let op = Operation::replace("Acme", "Globex");
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"type": "replace", "findText": "Acme", "replaceText": "Globex"})
        );
    }

    #[test]
    fn field_update_wire_format() {
        let op = Operation::field_update("designation", "Manager");
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"type": "field_update", "fieldName": "designation", "newValue": "Manager"})
        );
    }

    #[test]
    fn unresolved_replace_omits_value() {
        let op: Operation = serde_json::from_value(json!({"type": "replace", "findText": "Acme"})).unwrap();
        assert_eq!(op, Operation::replace_unresolved("Acme"));
        assert!(!op.is_resolved());
        assert_eq!(serde_json::to_value(&op).unwrap(), json!({"type": "replace", "findText": "Acme"}));
    }

    #[test]
    fn resolved_with_keeps_target() {
        let op = Operation::replace_unresolved("Acme").resolved_with("Globex");
        assert_eq!(op.target(), "Acme");
        assert_eq!(op.value(), Some("Globex"));
    }

    #[test]
    fn validate_target_rejects_blank() {
        assert_eq!(
            Operation::replace("", "x").validate_target(),
            Err(ValidationError::EmptyFindText)
        );
        assert_eq!(
            Operation::field_update("  ", "x").validate_target(),
            Err(ValidationError::EmptyFieldName)
        );
        assert!(Operation::replace(" ", "x").validate_target().is_ok());
    }

    #[test]
    fn parsed_command_validity() {
        let empty = ParsedCommand::new("hello", vec![]);
        assert!(!empty.is_valid);
        assert!(matches!(
            empty.into_operations(),
            Err(ValidationError::UnparseableCommand(input)) if input == "hello"
        ));

        let one = ParsedCommand::new("x", vec![Operation::replace("a", "b")]);
        assert!(one.is_valid);
        assert_eq!(one.into_operations().unwrap().len(), 1);
    }

    #[test]
    fn parsed_command_wire_format() {
        let cmd = ParsedCommand::new("x", vec![]);
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({"originalInput": "x", "operations": [], "isValid": false})
        );
    }
}
