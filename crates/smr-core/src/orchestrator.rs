//! Replacement orchestrator
//!
//! Composes the engine with the external collaborators into three flows:
//!
//! - [`single_replace`](ReplacementOrchestrator::single_replace): one literal
//!   replace, gated fail-fast by brand compliance
//! - [`smart_suggest`](ReplacementOrchestrator::smart_suggest): parse a
//!   command and preview every operation with a value, its confidence and an
//!   advisory compliance verdict; nothing is written
//! - [`smart_replace`](ReplacementOrchestrator::smart_replace): apply resolved
//!   operations to one fetched entry and persist once
//!
//! `smart_replace` does not re-check compliance. Callers execute only the
//! operations they accepted from the preview (see
//! [`SuggestPreview::accepted_operations`]).
//!
//! All engine work runs synchronously between collaborator calls; the only
//! suspension points are fetch, update, publish, profile load and
//! suggestion generation.

use crate::collaborators::{BrandProfileStore, ContentRepository, SuggestionProvider};
use crate::config::OrchestratorConfig;
use crate::error::{ReplaceError, ReplaceResult, UpstreamError};
use crate::session::{Session, SessionManager};
use crate::suggest::{build_prompt, request_suggestion, Suggestion};
use crate::types::{
    OperationPreview, ReplaceOutcome, ReplaceRequest, SmartReplaceRequest, SmartSuggestRequest,
    SuggestPreview, SuggestionSource,
};
use futures::future::join_all;
use indexmap::IndexMap;
use smr_engine::{
    apply_field_updates_with_report, collect_text, parse, score, BrandStyleProfile,
    ComplianceValidator, ComplianceVerdict, DeepReplacer, Entry, HeuristicComplianceValidator,
    Operation, ValidationError,
};
use std::sync::Arc;

/// The replace orchestrator
///
/// Cheap to share behind an `Arc`; holds no per-request state.
pub struct ReplacementOrchestrator {
    repository: Arc<dyn ContentRepository>,
    suggestions: Arc<dyn SuggestionProvider>,
    profiles: Arc<dyn BrandProfileStore>,
    sessions: Arc<SessionManager>,
    validator: Arc<dyn ComplianceValidator>,
    config: OrchestratorConfig,
}

impl ReplacementOrchestrator {
    /// Create orchestrator with the heuristic compliance validator
    #[must_use]
    pub fn new(
        repository: Arc<dyn ContentRepository>,
        suggestions: Arc<dyn SuggestionProvider>,
        profiles: Arc<dyn BrandProfileStore>,
        sessions: Arc<SessionManager>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            repository,
            suggestions,
            profiles,
            sessions,
            validator: Arc::new(HeuristicComplianceValidator),
            config,
        }
    }

    /// Use a different compliance validator
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn ComplianceValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Current brand profile
    ///
    /// # Errors
    /// Profile store failure
    pub async fn profile(&self) -> ReplaceResult<BrandStyleProfile> {
        Ok(self.profiles.load().await?)
    }

    /// Validate text against the current brand profile
    ///
    /// # Errors
    /// Profile store failure; a rejection is a verdict, not an error
    pub async fn check_compliance(&self, text: &str) -> ReplaceResult<ComplianceVerdict> {
        let profile = self.profile().await?;
        Ok(self.validator.validate(text, &profile))
    }

    /// Replace one literal across an entry, then save and publish
    ///
    /// # Errors
    /// - `Validation` for a blank entry id or find text (before any I/O)
    /// - `Compliance` when the replacement is rejected; nothing is written
    /// - `Upstream` for collaborator failures
    pub async fn single_replace(&self, request: &ReplaceRequest) -> ReplaceResult<ReplaceOutcome> {
        require(&request.entry_id, "entryId")?;
        let replacer = DeepReplacer::new(request.find_text.as_str(), request.replace_text.as_str())?
            .with_protected(self.config.protected.clone());

        tracing::info!(entry_id = %request.entry_id, "single replace");

        let verdict = self.check_compliance(&request.replace_text).await?;
        if !verdict.accepted {
            tracing::warn!(entry_id = %request.entry_id, reason = %verdict.reason, "replacement rejected");
        }
        verdict.into_result()?;

        let session = self.sessions.session().await?;
        let entry = self.fetch(&session, &request.entry_id).await?;
        let updated = replacer.apply(&entry);
        let published = self.persist(&session, &request.entry_id, &updated).await?;

        tracing::info!(entry_id = %request.entry_id, published, "single replace done");
        Ok(ReplaceOutcome {
            entry_id: request.entry_id.clone(),
            operations_applied: 1,
            field_updates: Vec::new(),
            published,
        })
    }

    /// Parse a command and preview each operation without writing
    ///
    /// Operations lacking a value are sent to the suggestion provider
    /// concurrently. Explicit values are scored and validated like generated
    /// ones, so the preview reads the same for both.
    ///
    /// # Errors
    /// - `Validation` for a blank entry id or a command with no operations
    /// - `Upstream` when fetching the entry or loading the profile fails
    pub async fn smart_suggest(&self, request: &SmartSuggestRequest) -> ReplaceResult<SuggestPreview> {
        require(&request.entry_id, "entryId")?;
        let operations = parse(&request.command).into_operations()?;

        tracing::info!(
            entry_id = %request.entry_id,
            operations = operations.len(),
            "smart suggest"
        );

        let session = self.sessions.session().await?;
        let entry = self.fetch(&session, &request.entry_id).await?;
        let profile = self.profile().await?;
        let context = collect_text(&entry, &self.config.protected);

        let resolved = join_all(operations.into_iter().map(|op| self.resolve(op, &context, &profile))).await;

        let previews = resolved
            .into_iter()
            .map(|(operation, source)| self.preview(operation, source, &context, &profile))
            .collect();

        Ok(SuggestPreview {
            entry_id: request.entry_id.clone(),
            command: request.command.clone(),
            operations: previews,
        })
    }

    /// Apply resolved operations to one entry, then save and publish once
    ///
    /// Replaces run in order through the transformer; field updates are
    /// batched into a single resolver pass after them. Compliance is not
    /// re-checked here.
    ///
    /// # Errors
    /// - `Validation` for a blank entry id, no operations, a blank target or
    ///   an operation without a value (all before any I/O)
    /// - `Upstream` for collaborator failures
    pub async fn smart_replace(&self, request: &SmartReplaceRequest) -> ReplaceResult<ReplaceOutcome> {
        require(&request.entry_id, "entryId")?;
        if request.operations.is_empty() {
            return Err(ValidationError::MissingInput("operations").into());
        }

        let mut replacers = Vec::new();
        let mut updates = IndexMap::new();
        for (index, op) in request.operations.iter().enumerate() {
            op.validate_target()?;
            match op {
                Operation::Replace { find_text, replace_text: Some(replace) } => {
                    replacers.push(
                        DeepReplacer::new(find_text.as_str(), replace.as_str())?
                            .with_protected(self.config.protected.clone()),
                    );
                }
                Operation::FieldUpdate { field_name, new_value: Some(value) } => {
                    updates.insert(field_name.clone(), value.clone());
                }
                _ => return Err(ValidationError::UnresolvedOperation { index }.into()),
            }
        }

        tracing::info!(
            entry_id = %request.entry_id,
            replaces = replacers.len(),
            field_updates = updates.len(),
            "smart replace"
        );

        let session = self.sessions.session().await?;
        let mut entry = self.fetch(&session, &request.entry_id).await?;

        for replacer in &replacers {
            tracing::debug!(find = replacer.find(), "applying replace");
            entry = replacer.apply(&entry);
        }
        let (entry, field_updates) = if updates.is_empty() {
            (entry, Vec::new())
        } else {
            apply_field_updates_with_report(&entry, &updates, &self.config.protected)
        };

        let published = self.persist(&session, &request.entry_id, &entry).await?;

        tracing::info!(entry_id = %request.entry_id, published, "smart replace done");
        Ok(ReplaceOutcome {
            entry_id: request.entry_id.clone(),
            operations_applied: request.operations.len(),
            field_updates,
            published,
        })
    }

    async fn resolve(
        &self,
        operation: Operation,
        context: &str,
        profile: &BrandStyleProfile,
    ) -> (Operation, SuggestionSource) {
        if operation.is_resolved() {
            return (operation, SuggestionSource::Explicit);
        }

        let prompt = build_prompt(&operation, context, profile, self.config.prompt_context_chars);
        match request_suggestion(self.suggestions.as_ref(), &prompt).await {
            Suggestion::Generated(text) => {
                tracing::debug!(operation_target = operation.target(), "suggestion generated");
                (operation.resolved_with(text), SuggestionSource::Generated)
            }
            Suggestion::Unavailable => (operation, SuggestionSource::Unavailable),
        }
    }

    fn preview(
        &self,
        operation: Operation,
        source: SuggestionSource,
        context: &str,
        profile: &BrandStyleProfile,
    ) -> OperationPreview {
        let (confidence, compliance) = match operation.value() {
            Some(value) => (
                score(Some(value), Some(context), operation.target()),
                self.validator.validate(value, profile),
            ),
            None => (0, ComplianceVerdict::reject("no suggestion available")),
        };

        OperationPreview {
            operation,
            source,
            confidence,
            compliance,
        }
    }

    async fn fetch(&self, session: &Session, entry_id: &str) -> ReplaceResult<Entry> {
        let result = self.repository.fetch(session, entry_id).await;
        Ok(self.observe(session, result).await?)
    }

    /// Save, then publish unless publishing is disabled
    async fn persist(&self, session: &Session, entry_id: &str, entry: &Entry) -> ReplaceResult<bool> {
        let result = self.repository.update(session, entry_id, entry).await;
        self.observe(session, result).await?;

        let target = &self.config.publish;
        if target.is_disabled() {
            return Ok(false);
        }
        let result = self.repository.publish(session, entry_id, target).await;
        self.observe(session, result).await?;
        Ok(true)
    }

    /// Drop the session on an auth failure; the error still propagates
    async fn observe<T>(&self, session: &Session, result: Result<T, UpstreamError>) -> Result<T, UpstreamError> {
        if let Err(err) = &result {
            tracing::error!(error = %err, "content repository call failed");
            if err.is_unauthorized() {
                self.sessions.invalidate(session).await;
            }
        }
        result
    }
}

impl std::fmt::Debug for ReplacementOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplacementOrchestrator")
            .field("validator", &self.validator)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn require(value: &str, name: &'static str) -> Result<(), ReplaceError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingInput(name).into());
    }
    Ok(())
}
