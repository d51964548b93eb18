//! Content API sessions
//!
//! A [`Session`] is passed explicitly into every repository call. The
//! [`SessionManager`] caches one session process-wide and refreshes it
//! single-flight: the cache lock is held across the login call, so callers
//! arriving during a refresh wait for it and then reuse its result instead of
//! logging in again.

use crate::collaborators::Authenticator;
use crate::error::UpstreamError;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Authenticated session credential
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    issued_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create session valid until the upstream rejects it
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            issued_at: Utc::now(),
            expires_at: None,
        }
    }

    /// Expire after `ttl`
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.expires_at = Some(self.issued_at + ttl);
        self
    }

    /// Raw token for request headers
    #[inline]
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// When the session was obtained
    #[inline]
    #[must_use]
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Check expiry against a given instant
    #[inline]
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    /// Check expiry against the current time
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Process-wide session cache with single-flight refresh
pub struct SessionManager {
    authenticator: Arc<dyn Authenticator>,
    current: Mutex<Option<Session>>,
}

impl SessionManager {
    /// Create manager; no login happens until the first request
    #[must_use]
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            authenticator,
            current: Mutex::new(None),
        }
    }

    /// Cached session, logging in first if none is valid
    ///
    /// # Errors
    /// Login failure from the authenticator; nothing is cached in that case
    pub async fn session(&self) -> Result<Session, UpstreamError> {
        let mut current = self.current.lock().await;
        if let Some(session) = current.as_ref().filter(|s| !s.is_expired()) {
            return Ok(session.clone());
        }

        tracing::info!("logging in to content API");
        let session = self.authenticator.login().await.map_err(|err| {
            tracing::error!(error = %err, "login failed");
            err
        })?;
        *current = Some(session.clone());
        Ok(session)
    }

    /// Drop the cached session if it is still `stale`
    ///
    /// A session refreshed by another request in the meantime is kept.
    pub async fn invalidate(&self, stale: &Session) {
        let mut current = self.current.lock().await;
        if current.as_ref().is_some_and(|s| s.token() == stale.token()) {
            tracing::warn!("session rejected upstream, dropping it");
            *current = None;
        }
    }

    /// Whether a session is cached
    pub async fn is_cached(&self) -> bool {
        self.current.lock().await.is_some()
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct Counting {
        logins: AtomicUsize,
    }

    #[async_trait]
    impl Authenticator for Counting {
        async fn login(&self) -> Result<Session, UpstreamError> {
            let n = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            Ok(Session::new(format!("token-{n}")))
        }
    }

    #[test]
    fn debug_redacts_token() {
        let rendered = format!("{:?}", Session::new("secret-token"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn ttl_expiry() {
        let session = Session::new("t").with_ttl(Duration::seconds(60));
        assert!(!session.is_expired_at(session.issued_at() + Duration::seconds(59)));
        assert!(session.is_expired_at(session.issued_at() + Duration::seconds(60)));
        assert!(!Session::new("t").is_expired());
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_login() {
        let auth = Arc::new(Counting::default());
        let manager = Arc::new(SessionManager::new(auth.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.session().await })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().token(), "token-1");
        }
        assert_eq!(auth.logins.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_only_drops_matching_session() {
        let auth = Arc::new(Counting::default());
        let manager = SessionManager::new(auth.clone());

        let first = manager.session().await.unwrap();
        manager.invalidate(&first).await;
        assert!(!manager.is_cached().await);

        let second = manager.session().await.unwrap();
        assert_eq!(second.token(), "token-2");

        // A late invalidation for the old token keeps the fresh one
        manager.invalidate(&first).await;
        assert!(manager.is_cached().await);
        assert_eq!(manager.session().await.unwrap().token(), "token-2");
        assert_eq!(auth.logins.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn expired_session_is_refreshed() {
        #[derive(Debug, Default)]
        struct ShortLived(AtomicUsize);

        #[async_trait]
        impl Authenticator for ShortLived {
            async fn login(&self) -> Result<Session, UpstreamError> {
                let n = self.0.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(Session::new(format!("t{n}")).with_ttl(Duration::zero()))
            }
        }

        let manager = SessionManager::new(Arc::new(ShortLived::default()));
        assert_eq!(manager.session().await.unwrap().token(), "t1");
        assert_eq!(manager.session().await.unwrap().token(), "t2");
    }
}
