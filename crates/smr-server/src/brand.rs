//! Brand style profile read from a JSON document
//!
//! ```json
//! { "formality_level": 4, "tone": 2, "humor_level": 1, "complexity_level": 3 }
//! ```
//!
//! The file is re-read on every load so edits apply without a restart.

use async_trait::async_trait;
use smr_core::{BrandProfileStore, UpstreamError};
use smr_engine::BrandStyleProfile;
use std::path::{Path, PathBuf};

/// File-backed profile store
#[derive(Debug, Clone, Default)]
pub struct FileBrandProfileStore {
    path: Option<PathBuf>,
}

impl FileBrandProfileStore {
    /// Create store; `None` always yields the default profile
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Configured document path
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[async_trait]
impl BrandProfileStore for FileBrandProfileStore {
    async fn load(&self) -> Result<BrandStyleProfile, UpstreamError> {
        let Some(path) = &self.path else {
            return Ok(BrandStyleProfile::default());
        };

        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no brand profile, using default");
                return Ok(BrandStyleProfile::default());
            }
            Err(err) => {
                return Err(UpstreamError::Transport(format!(
                    "cannot read brand profile {}: {err}",
                    path.display()
                )))
            }
        };

        let profile: BrandStyleProfile = serde_json::from_str(&text)
            .map_err(|e| UpstreamError::Decode(format!("brand profile {}: {e}", path.display())))?;
        profile
            .check()
            .map_err(|e| UpstreamError::Decode(format!("brand profile {}: {e}", path.display())))?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unset_or_missing_is_default() {
        assert_eq!(
            FileBrandProfileStore::default().load().await.unwrap(),
            BrandStyleProfile::default()
        );

        let dir = tempfile::tempdir().unwrap();
        let store = FileBrandProfileStore::new(Some(dir.path().join("absent.json")));
        assert_eq!(store.load().await.unwrap(), BrandStyleProfile::default());
    }

    #[tokio::test]
    async fn reads_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brand.json");
        std::fs::write(
            &path,
            r#"{"formality_level": 5, "tone": 2, "humor_level": 1, "complexity_level": 2}"#,
        )
        .unwrap();

        let profile = FileBrandProfileStore::new(Some(path)).load().await.unwrap();
        assert_eq!(profile, BrandStyleProfile::new(5, 2, 1, 2));
    }

    #[tokio::test]
    async fn out_of_range_level_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brand.json");
        std::fs::write(
            &path,
            r#"{"formality_level": 9, "tone": 1, "humor_level": 3, "complexity_level": 3}"#,
        )
        .unwrap();

        let err = FileBrandProfileStore::new(Some(path)).load().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(ref m) if m.contains("formality_level")), "{err}");
    }

    #[tokio::test]
    async fn malformed_document_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brand.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileBrandProfileStore::new(Some(path)).load().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }
}
