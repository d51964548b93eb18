//! Smart Replace Core - replacement orchestrator
//!
//! Drives the engine against a remote content API:
//! - Fetches one fresh entry per request through a [`ContentRepository`]
//! - Resolves missing replacement values through a [`SuggestionProvider`]
//! - Gates single replaces on brand compliance from a [`BrandProfileStore`]
//! - Persists and publishes the rewritten entry once per request
//! - Shares one content API [`Session`], refreshed single-flight
//!
//! # Example
//!
//! ```rust,ignore
//! use smr_core::{OrchestratorConfig, ReplaceRequest, ReplacementOrchestrator, SessionManager};
//! use std::sync::Arc;
//!
//! # async fn example(repo: Arc<dyn smr_core::ContentRepository>,
//! #                  provider: Arc<dyn smr_core::SuggestionProvider>,
//! #                  profiles: Arc<dyn smr_core::BrandProfileStore>,
//! #                  auth: Arc<dyn smr_core::Authenticator>) -> Result<(), smr_core::ReplaceError> {
//! let sessions = Arc::new(SessionManager::new(auth));
//! let orchestrator = ReplacementOrchestrator::new(repo, provider, profiles, sessions, OrchestratorConfig::new());
//!
//! let outcome = orchestrator
//!     .single_replace(&ReplaceRequest::new("blt123", "Acme", "Globex"))
//!     .await?;
//! println!("published: {}", outcome.published);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod collaborators;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod session;
pub mod suggest;
pub mod types;

// Re-exports for convenience
pub use collaborators::{Authenticator, BrandProfileStore, ContentRepository, SuggestionProvider};
pub use config::{OrchestratorConfig, PublishTarget, DEFAULT_PROMPT_CONTEXT_CHARS};
pub use error::{ReplaceError, ReplaceResult, UpstreamError};
pub use orchestrator::ReplacementOrchestrator;
pub use session::{Session, SessionManager};
pub use suggest::{build_prompt, clean_reply, request_suggestion, Suggestion};
pub use types::{
    OperationPreview, ReplaceOutcome, ReplaceRequest, SmartReplaceRequest, SmartSuggestRequest,
    SuggestPreview, SuggestionSource,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the orchestrator
    pub use crate::{
        Authenticator, BrandProfileStore, ContentRepository, OrchestratorConfig, PublishTarget,
        ReplaceError, ReplaceOutcome, ReplaceRequest, ReplacementOrchestrator, Session,
        SessionManager, SmartReplaceRequest, SmartSuggestRequest, SuggestionProvider,
        UpstreamError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
