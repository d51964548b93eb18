//! Orchestrator configuration

use serde::{Deserialize, Serialize};
use smr_engine::ProtectedFields;

/// Default number of context characters sent with a suggestion prompt
pub const DEFAULT_PROMPT_CONTEXT_CHARS: usize = 2000;

/// Where a persisted entry gets published
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishTarget {
    /// Environment names
    pub environments: Vec<String>,
    /// Locale codes
    pub locales: Vec<String>,
}

impl PublishTarget {
    /// Create target from environments and locales
    #[must_use]
    pub fn new<E, L>(environments: E, locales: L) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            environments: environments.into_iter().map(Into::into).collect(),
            locales: locales.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether publishing is switched off
    #[inline]
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.environments.is_empty()
    }
}

impl Default for PublishTarget {
    fn default() -> Self {
        Self::new(["development"], ["en-us"])
    }
}

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Publish target after every successful persist
    pub publish: PublishTarget,
    /// Keys never rewritten by replace or field updates
    pub protected: ProtectedFields,
    /// Context characters included in suggestion prompts
    pub prompt_context_chars: usize,
}

impl OrchestratorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With publish target
    #[inline]
    #[must_use]
    pub fn with_publish(mut self, publish: PublishTarget) -> Self {
        self.publish = publish;
        self
    }

    /// With protected fields
    #[inline]
    #[must_use]
    pub fn with_protected(mut self, protected: ProtectedFields) -> Self {
        self.protected = protected;
        self
    }

    /// With prompt context length
    #[inline]
    #[must_use]
    pub fn with_prompt_context_chars(mut self, chars: usize) -> Self {
        self.prompt_context_chars = chars;
        self
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            publish: PublishTarget::default(),
            protected: ProtectedFields::default(),
            prompt_context_chars: DEFAULT_PROMPT_CONTEXT_CHARS,
        }
    }
}
