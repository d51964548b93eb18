//! Request and result shapes for the replace flows
//!
//! All types serialize with camelCase field names.

use serde::{Deserialize, Serialize};
use smr_engine::{ComplianceVerdict, FieldUpdateReport, Operation};

/// Single literal replace across one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceRequest {
    /// Entry to edit
    pub entry_id: String,
    /// Literal text to find
    pub find_text: String,
    /// Replacement text
    pub replace_text: String,
}

impl ReplaceRequest {
    /// Create request
    #[must_use]
    pub fn new(
        entry_id: impl Into<String>,
        find_text: impl Into<String>,
        replace_text: impl Into<String>,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            find_text: find_text.into(),
            replace_text: replace_text.into(),
        }
    }
}

/// Preview request: parse a command and propose values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartSuggestRequest {
    /// Entry to edit
    pub entry_id: String,
    /// Free-text instruction
    pub command: String,
}

impl SmartSuggestRequest {
    /// Create request
    #[must_use]
    pub fn new(entry_id: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            entry_id: entry_id.into(),
            command: command.into(),
        }
    }
}

/// Execute request: apply already-resolved operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartReplaceRequest {
    /// Entry to edit
    pub entry_id: String,
    /// Operations to apply; every one must carry a value
    pub operations: Vec<Operation>,
}

impl SmartReplaceRequest {
    /// Create request
    #[must_use]
    pub fn new(entry_id: impl Into<String>, operations: Vec<Operation>) -> Self {
        Self {
            entry_id: entry_id.into(),
            operations,
        }
    }
}

/// Where a previewed value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    /// Given in the command
    Explicit,
    /// Produced by the suggestion provider
    Generated,
    /// Provider failed or returned nothing usable
    Unavailable,
}

/// One operation in a preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationPreview {
    /// The operation, with its value filled in when one is known
    pub operation: Operation,
    /// Origin of the value
    pub source: SuggestionSource,
    /// Confidence in the value (0 when unavailable)
    pub confidence: u8,
    /// Brand compliance of the value; advisory only
    pub compliance: ComplianceVerdict,
}

/// Result of the preview flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestPreview {
    /// Entry the preview was computed against
    pub entry_id: String,
    /// Instruction as given
    pub command: String,
    /// Per-operation previews, in parse order
    pub operations: Vec<OperationPreview>,
}

impl SuggestPreview {
    /// Operations that are resolved and compliant
    ///
    /// Callers filter with this before executing, since execution does not
    /// re-check compliance.
    #[must_use]
    pub fn accepted_operations(&self) -> Vec<Operation> {
        self.operations
            .iter()
            .filter(|p| p.operation.is_resolved() && p.compliance.accepted)
            .map(|p| p.operation.clone())
            .collect()
    }
}

/// Result of a replace flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceOutcome {
    /// Entry that was edited
    pub entry_id: String,
    /// Replace and field update operations applied
    pub operations_applied: usize,
    /// Resolution of each requested field update
    pub field_updates: Vec<FieldUpdateReport>,
    /// Whether the entry was published after saving
    pub published: bool,
}
