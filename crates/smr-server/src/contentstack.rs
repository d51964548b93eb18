//! Contentstack content management API
//!
//! [`ContentstackRepository`] implements [`ContentRepository`] over the
//! entries endpoints of one content type; [`ContentstackAuthenticator`]
//! obtains user session tokens through `/user-session`.
//!
//! Every entry call carries the stack `api_key` header plus the session's
//! `authtoken`. Entries travel wrapped as `{"entry": {...}}`.

use crate::config::{ConfigError, ContentstackConfig, Secret};
use crate::http::{build_client, endpoint, parse_base, read_json, transport};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde_json::{json, Value};
use smr_core::{Authenticator, ContentRepository, PublishTarget, Session, UpstreamError};
use smr_engine::Entry;

/// Request timeout for content API calls
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Entries of one content type in one stack
pub struct ContentstackRepository {
    http: Client,
    base: Url,
    api_key: Secret,
    content_type: String,
    locale: String,
}

impl ContentstackRepository {
    /// Create repository from configuration
    ///
    /// # Errors
    /// `Missing` without an API key or content type, `Invalid` for a bad base URL
    pub fn new(config: &ContentstackConfig) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(ConfigError::Missing("contentstack.api_key"))?;
        if config.content_type.trim().is_empty() {
            return Err(ConfigError::Missing("contentstack.content_type"));
        }
        Ok(Self {
            http: build_client(REQUEST_TIMEOUT_SECS),
            base: parse_base(&config.base_url, "contentstack.base_url")?,
            api_key,
            content_type: config.content_type.clone(),
            locale: config.locale.clone(),
        })
    }

    fn entry_url(&self, entry_id: &str) -> Url {
        endpoint(
            &self.base,
            &["content_types", &self.content_type, "entries", entry_id],
        )
    }

    fn authorized(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request
            .header("api_key", self.api_key.expose())
            .header("authtoken", session.token())
            .query(&[("locale", self.locale.as_str())])
    }
}

impl std::fmt::Debug for ContentstackRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentstackRepository")
            .field("base", &self.base.as_str())
            .field("content_type", &self.content_type)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ContentRepository for ContentstackRepository {
    async fn fetch(&self, session: &Session, entry_id: &str) -> Result<Entry, UpstreamError> {
        tracing::debug!(entry_id, content_type = %self.content_type, "fetching entry");
        let response = self
            .authorized(self.http.get(self.entry_url(entry_id)), session)
            .send()
            .await
            .map_err(transport)?;

        let mut body = read_json(response).await?;
        match body.get_mut("entry").map(Value::take) {
            Some(entry @ Value::Object(_)) => Ok(entry),
            _ => Err(UpstreamError::Decode(format!(
                "response for entry {entry_id} has no entry object"
            ))),
        }
    }

    async fn update(&self, session: &Session, entry_id: &str, entry: &Entry) -> Result<(), UpstreamError> {
        tracing::debug!(entry_id, "saving entry");
        let response = self
            .authorized(self.http.put(self.entry_url(entry_id)), session)
            .json(&json!({ "entry": entry }))
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await.map(drop)
    }

    async fn publish(
        &self,
        session: &Session,
        entry_id: &str,
        target: &PublishTarget,
    ) -> Result<(), UpstreamError> {
        tracing::debug!(
            entry_id,
            environments = ?target.environments,
            locales = ?target.locales,
            "publishing entry"
        );
        let url = endpoint(&self.entry_url(entry_id), &["publish"]);
        let body = json!({
            "entry": {
                "environments": target.environments,
                "locales": target.locales,
            },
            "locale": self.locale,
        });
        let response = self
            .authorized(self.http.post(url), session)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await.map(drop)
    }
}

/// Email and password login
pub struct ContentstackAuthenticator {
    http: Client,
    login_url: Url,
    email: String,
    password: Secret,
    ttl: Option<chrono::Duration>,
}

impl ContentstackAuthenticator {
    /// Create authenticator from configuration
    ///
    /// # Errors
    /// `Missing` without email or password, `Invalid` for a bad base URL or TTL
    pub fn new(config: &ContentstackConfig) -> Result<Self, ConfigError> {
        let email = config
            .email
            .clone()
            .ok_or(ConfigError::Missing("contentstack.email"))?;
        let password = config
            .password
            .clone()
            .ok_or(ConfigError::Missing("contentstack.password"))?;
        let ttl = config
            .session_ttl_secs
            .map(|secs| {
                i64::try_from(secs)
                    .ok()
                    .and_then(chrono::Duration::try_seconds)
                    .ok_or_else(|| ConfigError::Invalid {
                        key: "contentstack.session_ttl_secs",
                        reason: format!("{secs} is out of range"),
                    })
            })
            .transpose()?;
        let base = parse_base(&config.base_url, "contentstack.base_url")?;

        Ok(Self {
            http: build_client(REQUEST_TIMEOUT_SECS),
            login_url: endpoint(&base, &["user-session"]),
            email,
            password,
            ttl,
        })
    }
}

impl std::fmt::Debug for ContentstackAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentstackAuthenticator")
            .field("login_url", &self.login_url.as_str())
            .field("email", &self.email)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Authenticator for ContentstackAuthenticator {
    async fn login(&self) -> Result<Session, UpstreamError> {
        tracing::info!(email = %self.email, "logging in to content API");
        let body = json!({
            "user": {
                "email": self.email,
                "password": self.password.expose(),
            }
        });
        let response = self
            .http
            .post(self.login_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let body = read_json(response).await?;
        let token = body
            .pointer("/user/authtoken")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| UpstreamError::Decode("login response has no authtoken".into()))?;

        let session = Session::new(token);
        Ok(match self.ttl {
            Some(ttl) => session.with_ttl(ttl),
            None => session,
        })
    }
}
