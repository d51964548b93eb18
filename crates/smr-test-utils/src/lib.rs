//! Testing utilities for the smart replace workspace
//!
//! Shared fixtures and in-memory collaborators.

#![allow(missing_docs)]

use async_trait::async_trait;
use serde_json::json;
use smr_core::{
    Authenticator, BrandProfileStore, ContentRepository, OrchestratorConfig, PublishTarget,
    ReplacementOrchestrator, Session, SessionManager, SuggestionProvider, UpstreamError,
};
use smr_engine::{BrandStyleProfile, Entry};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ----------------------------------------------------------------------------
// Fixtures
// ----------------------------------------------------------------------------

/// Entry from the person-rename scenario
pub fn john_smith_entry() -> Entry {
    json!({
        "title": "Report by John Smith",
        "body": "Contact John Smith at john@x.com",
        "uid": "e1",
    })
}

/// CMS-shaped entry with metadata, nested blocks and markup
pub fn sample_entry() -> Entry {
    json!({
        "uid": "blt0001",
        "_version": 3,
        "locale": "en-us",
        "title": "Acme quarterly report",
        "author": "John Smith",
        "designation": "Engineer",
        "body": "<p>Acme grew. See <a href=\"/about-acme\">Acme</a>.</p>",
        "blocks": [
            {"heading": "Why Acme", "text": "Acme Corp builds tools"},
            {"heading": "Contact", "text": "Write to sales@acme.com"},
        ],
        "created_by": "blt_user_acme",
        "updated_by": "blt_user_acme",
        "publish_details": {"environment": "development", "locale": "en-us"},
    })
}

/// Formal, measured brand voice
pub fn formal_profile() -> BrandStyleProfile {
    BrandStyleProfile::new(5, 2, 1, 1)
}

// ----------------------------------------------------------------------------
// Content repository
// ----------------------------------------------------------------------------

/// Repository backed by a map, recording every write
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    entries: Mutex<HashMap<String, Entry>>,
    updates: Mutex<Vec<(String, Entry)>>,
    publishes: Mutex<Vec<(String, PublishTarget)>>,
    revoked: Mutex<HashSet<String>>,
    tokens_seen: Mutex<Vec<String>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, id: &str, entry: Entry) -> Self {
        self.entries.lock().unwrap().insert(id.to_string(), entry);
        self
    }

    /// Reject every later call made with `token`
    pub fn revoke(&self, token: &str) {
        self.revoked.lock().unwrap().insert(token.to_string());
    }

    pub fn entry(&self, id: &str) -> Option<Entry> {
        self.entries.lock().unwrap().get(id).cloned()
    }

    pub fn updates(&self) -> Vec<(String, Entry)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn publishes(&self) -> Vec<(String, PublishTarget)> {
        self.publishes.lock().unwrap().clone()
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen.lock().unwrap().clone()
    }

    fn authorize(&self, session: &Session) -> Result<(), UpstreamError> {
        self.tokens_seen
            .lock()
            .unwrap()
            .push(session.token().to_string());
        if self.revoked.lock().unwrap().contains(session.token()) {
            return Err(UpstreamError::Unauthorized("session revoked".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn fetch(&self, session: &Session, entry_id: &str) -> Result<Entry, UpstreamError> {
        self.authorize(session)?;
        self.entry(entry_id)
            .ok_or_else(|| UpstreamError::NotFound(format!("entry {entry_id}")))
    }

    async fn update(&self, session: &Session, entry_id: &str, entry: &Entry) -> Result<(), UpstreamError> {
        self.authorize(session)?;
        self.entries
            .lock()
            .unwrap()
            .insert(entry_id.to_string(), entry.clone());
        self.updates
            .lock()
            .unwrap()
            .push((entry_id.to_string(), entry.clone()));
        Ok(())
    }

    async fn publish(
        &self,
        session: &Session,
        entry_id: &str,
        target: &PublishTarget,
    ) -> Result<(), UpstreamError> {
        self.authorize(session)?;
        self.publishes
            .lock()
            .unwrap()
            .push((entry_id.to_string(), target.clone()));
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Suggestion provider
// ----------------------------------------------------------------------------

/// Provider answering from a script keyed by prompt substrings
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: Vec<(String, Result<String, UpstreamError>)>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `reply` when the prompt contains `needle`
    pub fn reply_when(mut self, needle: &str, reply: &str) -> Self {
        self.script.push((needle.to_string(), Ok(reply.to_string())));
        self
    }

    /// Fail with `error` when the prompt contains `needle`
    pub fn fail_when(mut self, needle: &str, error: UpstreamError) -> Self {
        self.script.push((needle.to_string(), Err(error)));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SuggestionProvider for ScriptedProvider {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.script
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| Err(UpstreamError::Provider("no scripted reply".into())))
    }
}

// ----------------------------------------------------------------------------
// Authenticator and profile store
// ----------------------------------------------------------------------------

/// Authenticator issuing `token-1`, `token-2`, ... and counting logins
#[derive(Debug, Default)]
pub struct CountingAuthenticator {
    logins: AtomicUsize,
    delay: Option<Duration>,
}

impl CountingAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep during each login to widen race windows
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for CountingAuthenticator {
    async fn login(&self) -> Result<Session, UpstreamError> {
        let n = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(Session::new(format!("token-{n}")))
    }
}

/// Profile store returning a fixed profile
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticProfileStore(pub BrandStyleProfile);

#[async_trait]
impl BrandProfileStore for StaticProfileStore {
    async fn load(&self) -> Result<BrandStyleProfile, UpstreamError> {
        Ok(self.0)
    }
}

// ----------------------------------------------------------------------------
// Harness
// ----------------------------------------------------------------------------

/// Orchestrator wired to in-memory collaborators, with handles kept for
/// assertions
pub struct Harness {
    pub repository: Arc<InMemoryRepository>,
    pub provider: Arc<ScriptedProvider>,
    pub authenticator: Arc<CountingAuthenticator>,
    pub sessions: Arc<SessionManager>,
    pub orchestrator: ReplacementOrchestrator,
}

impl Harness {
    pub fn new(repository: InMemoryRepository, provider: ScriptedProvider, profile: BrandStyleProfile) -> Self {
        Self::with_config(repository, provider, profile, OrchestratorConfig::new())
    }

    pub fn with_config(
        repository: InMemoryRepository,
        provider: ScriptedProvider,
        profile: BrandStyleProfile,
        config: OrchestratorConfig,
    ) -> Self {
        let repository = Arc::new(repository);
        let provider = Arc::new(provider);
        let authenticator = Arc::new(CountingAuthenticator::new());
        let sessions = Arc::new(SessionManager::new(authenticator.clone()));
        let orchestrator = ReplacementOrchestrator::new(
            repository.clone(),
            provider.clone(),
            Arc::new(StaticProfileStore(profile)),
            sessions.clone(),
            config,
        );
        Self {
            repository,
            provider,
            authenticator,
            sessions,
            orchestrator,
        }
    }
}
