//! Smart Replace Server - HTTP service and remote collaborators
//!
//! Connects the orchestrator to the outside world:
//! - [`contentstack`]: entry fetch/update/publish and user-session login
//! - [`openai`]: replacement suggestions from a chat completions API
//! - [`brand`]: brand style profile from a JSON document
//! - [`routes`]: warp filters exposing the engine and orchestrator flows
//! - [`config`]: TOML configuration with secret overrides
//!
//! # Example
//!
//! ```rust,ignore
//! use smr_server::{app, config::AppConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::load("smart-replace.toml".as_ref())?;
//! app::serve(config, async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod app;
pub mod brand;
pub mod config;
pub mod contentstack;
mod http;
pub mod openai;
pub mod routes;
pub mod telemetry;

pub use app::{build_orchestrator, serve};
pub use brand::FileBrandProfileStore;
pub use config::{AppConfig, ConfigError, LogFormat, SecretOverrides, DEFAULT_CONFIG_PATH};
pub use contentstack::{ContentstackAuthenticator, ContentstackRepository};
pub use openai::OpenAiSuggestionProvider;
pub use routes::{routes, ParseRequest, ScoreRequest, ScoreResponse, ValidateRequest};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
