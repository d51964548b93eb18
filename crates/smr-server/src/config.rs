//! Application configuration
//!
//! Loaded from a TOML file (default `smart-replace.toml`). A missing file
//! yields the defaults; every section and field is optional. Secrets may
//! also come from the environment through the CLI.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8080"
//!
//! [contentstack]
//! api_key = "blt..."
//! content_type = "article"
//! email = "editor@example.com"
//! password = "..."
//!
//! [publish]
//! environments = ["production"]
//!
//! [suggestions]
//! model = "gpt-4o-mini"
//!
//! [brand]
//! profile_path = "brand-style.json"
//! ```

use serde::{Deserialize, Serialize};
use smr_core::{OrchestratorConfig, PublishTarget};
use smr_engine::ProtectedFields;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_PATH: &str = "smart-replace.toml";

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File exists but could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting needed by the requested command is absent
    #[error("missing setting: {0}")]
    Missing(&'static str),

    /// A setting has an unusable value
    #[error("invalid setting {key}: {reason}")]
    Invalid {
        /// Setting name
        key: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// String value never printed by `Debug`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The secret itself
    #[inline]
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

/// Content API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentstackConfig {
    /// API root including the version segment
    pub base_url: String,
    /// Stack API key
    pub api_key: Option<Secret>,
    /// Content type uid of the edited entries
    pub content_type: String,
    /// Locale for fetch and update
    pub locale: String,
    /// Login email
    pub email: Option<String>,
    /// Login password
    pub password: Option<Secret>,
    /// Session lifetime; unset keeps a session until it is rejected
    pub session_ttl_secs: Option<u64>,
}

impl Default for ContentstackConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.contentstack.io/v3".to_string(),
            api_key: None,
            content_type: String::new(),
            locale: "en-us".to_string(),
            email: None,
            password: None,
            session_ttl_secs: None,
        }
    }
}

/// Suggestion provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionsConfig {
    /// OpenAI-compatible API root
    pub base_url: String,
    /// Bearer key
    pub api_key: Option<Secret>,
    /// Chat model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Request timeout
    pub timeout_secs: u64,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            timeout_secs: 30,
        }
    }
}

/// Brand style settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandConfig {
    /// JSON style document; unset or missing means the neutral profile
    pub profile_path: Option<PathBuf>,
}

/// Engine settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Keys never rewritten
    pub protected_fields: ProtectedFields,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Invalid {
                key: "logging.format",
                reason: format!("unknown format '{other}'"),
            }),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Secret values supplied outside the config file
#[derive(Debug, Clone, Default)]
pub struct SecretOverrides {
    /// Stack API key
    pub contentstack_api_key: Option<String>,
    /// Login email
    pub contentstack_email: Option<String>,
    /// Login password
    pub contentstack_password: Option<String>,
    /// Suggestion provider key
    pub openai_api_key: Option<String>,
}

/// Whole application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener
    pub server: ServerConfig,
    /// Content API
    pub contentstack: ContentstackConfig,
    /// Publish target after saving
    pub publish: PublishTarget,
    /// Suggestion provider
    pub suggestions: SuggestionsConfig,
    /// Brand style
    pub brand: BrandConfig,
    /// Engine
    pub engine: EngineConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// `Parse` for malformed TOML or mistyped values
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration, falling back to defaults if the file is absent
    ///
    /// # Errors
    /// `Io` if the file exists but is unreadable, `Parse` if it is malformed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Overlay secrets from the environment or command line
    #[must_use]
    pub fn with_secrets(mut self, overrides: SecretOverrides) -> Self {
        if let Some(key) = overrides.contentstack_api_key {
            self.contentstack.api_key = Some(Secret::new(key));
        }
        if let Some(email) = overrides.contentstack_email {
            self.contentstack.email = Some(email);
        }
        if let Some(password) = overrides.contentstack_password {
            self.contentstack.password = Some(Secret::new(password));
        }
        if let Some(key) = overrides.openai_api_key {
            self.suggestions.api_key = Some(Secret::new(key));
        }
        self
    }

    /// Check the settings the HTTP service needs
    ///
    /// # Errors
    /// `Missing` naming the first absent setting
    pub fn check_service(&self) -> Result<(), ConfigError> {
        let cs = &self.contentstack;
        if cs.api_key.is_none() {
            return Err(ConfigError::Missing("contentstack.api_key"));
        }
        if cs.content_type.trim().is_empty() {
            return Err(ConfigError::Missing("contentstack.content_type"));
        }
        if cs.email.is_none() {
            return Err(ConfigError::Missing("contentstack.email"));
        }
        if cs.password.is_none() {
            return Err(ConfigError::Missing("contentstack.password"));
        }
        Ok(())
    }

    /// Orchestrator settings derived from this configuration
    #[must_use]
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig::new()
            .with_publish(self.publish.clone())
            .with_protected(self.engine.protected_fields.clone())
    }
}
