//! External collaborator contracts
//!
//! The orchestrator only talks to the outside world through these traits.
//! Implementations own their transport, timeouts and any retry policy; the
//! orchestrator itself never retries.

use crate::config::PublishTarget;
use crate::error::UpstreamError;
use crate::session::Session;
use async_trait::async_trait;
use smr_engine::{BrandStyleProfile, Entry};

/// Remote store of content entries
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Fetch a fresh copy of an entry
    async fn fetch(&self, session: &Session, entry_id: &str) -> Result<Entry, UpstreamError>;

    /// Replace the stored entry
    async fn update(&self, session: &Session, entry_id: &str, entry: &Entry) -> Result<(), UpstreamError>;

    /// Publish the stored entry
    async fn publish(
        &self,
        session: &Session,
        entry_id: &str,
        target: &PublishTarget,
    ) -> Result<(), UpstreamError>;
}

/// Remote text generation
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Generate a completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError>;
}

/// Source of the brand style profile
#[async_trait]
pub trait BrandProfileStore: Send + Sync {
    /// Load the current profile
    async fn load(&self) -> Result<BrandStyleProfile, UpstreamError>;
}

/// Credential exchange for content API sessions
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Obtain a new session
    async fn login(&self) -> Result<Session, UpstreamError>;
}
