//! Wiring configuration into a running service

use crate::brand::FileBrandProfileStore;
use crate::config::{AppConfig, ConfigError};
use crate::contentstack::{ContentstackAuthenticator, ContentstackRepository};
use crate::openai::OpenAiSuggestionProvider;
use crate::routes::routes;
use smr_core::{ReplacementOrchestrator, SessionManager};
use std::future::Future;
use std::sync::Arc;

/// Build the orchestrator over the remote collaborators
///
/// # Errors
/// Any missing or invalid content API setting
pub fn build_orchestrator(config: &AppConfig) -> Result<ReplacementOrchestrator, ConfigError> {
    config.check_service()?;

    let repository = Arc::new(ContentstackRepository::new(&config.contentstack)?);
    let authenticator = Arc::new(ContentstackAuthenticator::new(&config.contentstack)?);
    let suggestions = Arc::new(OpenAiSuggestionProvider::new(&config.suggestions)?);
    if config.suggestions.api_key.is_none() {
        tracing::warn!("no suggestion API key, generated suggestions will be unavailable");
    }
    let profiles = Arc::new(FileBrandProfileStore::new(config.brand.profile_path.clone()));
    let sessions = Arc::new(SessionManager::new(authenticator));

    Ok(ReplacementOrchestrator::new(
        repository,
        suggestions,
        profiles,
        sessions,
        config.orchestrator_config(),
    ))
}

/// Serve the HTTP routes until `shutdown` resolves
///
/// # Errors
/// Configuration errors, or failure to bind the listen address
pub async fn serve<S>(config: AppConfig, shutdown: S) -> anyhow::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let orchestrator = Arc::new(build_orchestrator(&config)?);
    tracing::debug!(?orchestrator, "orchestrator ready");

    let (addr, server) =
        warp::serve(routes(orchestrator)).try_bind_with_graceful_shutdown(config.server.bind, shutdown)?;
    tracing::info!(%addr, "smart replace service listening");

    server.await;
    tracing::info!("smart replace service stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecretOverrides;

    fn complete() -> AppConfig {
        let mut config = AppConfig::default().with_secrets(SecretOverrides {
            contentstack_api_key: Some("blt-key".into()),
            contentstack_email: Some("editor@example.com".into()),
            contentstack_password: Some("secret".into()),
            openai_api_key: None,
        });
        config.contentstack.content_type = "article".into();
        config
    }

    #[test]
    fn builds_from_complete_config() {
        let orchestrator = build_orchestrator(&complete()).unwrap();
        assert_eq!(orchestrator.config().publish.environments, vec!["development"]);
    }

    #[test]
    fn missing_credentials_are_reported() {
        let mut config = complete();
        config.contentstack.password = None;
        assert!(matches!(
            build_orchestrator(&config),
            Err(ConfigError::Missing("contentstack.password"))
        ));
    }

    #[test]
    fn bad_base_url_is_reported() {
        let mut config = complete();
        config.contentstack.base_url = "not a url".into();
        assert!(matches!(
            build_orchestrator(&config),
            Err(ConfigError::Invalid { key: "contentstack.base_url", .. })
        ));
    }
}
