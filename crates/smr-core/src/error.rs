//! Error types for the orchestrator
//!
//! Provides error handling for:
//! - Collaborator (content repository, suggestion provider, login) failures
//! - Replace flow failures, wrapping engine validation and compliance errors

use smr_engine::{ComplianceError, EngineError, ValidationError};

/// A collaborator call failed
///
/// Payloads are rendered messages so the type stays independent of any
/// particular HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    /// Credentials rejected or session expired
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Requested record does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Non-success status from the remote service
    #[error("upstream returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Connection, TLS or timeout failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body did not have the expected shape
    #[error("decode error: {0}")]
    Decode(String),

    /// Text generation failed
    #[error("suggestion provider error: {0}")]
    Provider(String),
}

impl UpstreamError {
    /// Check if the session used for the call should be dropped
    #[inline]
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Map an HTTP status and body onto the matching variant
    #[must_use]
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => Self::Unauthorized(body),
            404 => Self::NotFound(body),
            _ => Self::Status { status, body },
        }
    }
}

/// Replace flow error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplaceError {
    /// Malformed request
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Replacement rejected by brand compliance
    #[error("{0}")]
    Compliance(#[from] ComplianceError),

    /// Collaborator failure
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),
}

impl ReplaceError {
    /// HTTP status an API layer should answer with
    #[must_use]
    pub fn status_hint(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Compliance(_) => 422,
            Self::Upstream(UpstreamError::Unauthorized(_)) => 401,
            Self::Upstream(UpstreamError::NotFound(_)) => 404,
            Self::Upstream(_) => 502,
        }
    }

    /// Short machine-readable error kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Compliance(_) => "compliance",
            Self::Upstream(_) => "upstream",
        }
    }
}

impl From<EngineError> for ReplaceError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(e) => Self::Validation(e),
            EngineError::Compliance(e) => Self::Compliance(e),
        }
    }
}

/// Result type alias for replace flows
pub type ReplaceResult<T> = Result<T, ReplaceError>;
