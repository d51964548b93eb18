//! Log subscriber installation, called once from the binary

use crate::config::LogFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// An explicit `directive` wins; otherwise `RUST_LOG`, then `default_level`.
///
/// # Errors
/// Fails on an unparseable directive or if a subscriber is already installed
pub fn init_tracing(
    directive: Option<&str>,
    default_level: &str,
    format: LogFormat,
) -> anyhow::Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?,
    };

    let subscriber = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Json => subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => subscriber
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("cannot install log subscriber: {e}"))
}
