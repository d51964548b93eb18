//! Shared reqwest plumbing for the remote collaborators

use crate::config::ConfigError;
use reqwest::{Client, Response, Url};
use serde_json::Value;
use smr_core::UpstreamError;
use std::time::Duration;

/// Longest error body carried into an `UpstreamError`
const MAX_ERROR_CHARS: usize = 200;

/// Pooled client with the given request timeout
pub(crate) fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Parse an API root that path segments can be appended to
pub(crate) fn parse_base(raw: &str, key: &'static str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("'{raw}' cannot carry a path"),
        });
    }
    Ok(url)
}

/// Append percent-encoded path segments to an API root
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

pub(crate) fn transport(err: reqwest::Error) -> UpstreamError {
    UpstreamError::Transport(err.without_url().to_string())
}

/// Decode a JSON body, mapping non-success statuses onto `UpstreamError`
pub(crate) async fn read_json(response: Response) -> Result<Value, UpstreamError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(UpstreamError::from_status(status.as_u16(), error_message(&body)));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| UpstreamError::Decode(e.to_string()))
}

/// Pull the human-readable message out of an error body, truncated
///
/// Understands `{"error_message": ...}` and `{"error": {"message": ...}}`;
/// anything else is kept as raw text.
pub(crate) fn error_message(body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error_message")
                .or_else(|| v.pointer("/error/message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string());

    if message.chars().count() <= MAX_ERROR_CHARS {
        return message;
    }
    let cut: String = message.chars().take(MAX_ERROR_CHARS).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_segments() {
        let base = parse_base("https://api.example.com/v3/", "base").unwrap();
        let url = endpoint(&base, &["content_types", "blog post", "entries", "a/b"]);
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v3/content_types/blog%20post/entries/a%2Fb"
        );
    }

    #[test]
    fn base_must_carry_a_path() {
        assert!(matches!(
            parse_base("mailto:ops@example.com", "base"),
            Err(ConfigError::Invalid { key: "base", .. })
        ));
        assert!(parse_base("not a url", "base").is_err());
    }

    #[test]
    fn error_message_shapes() {
        assert_eq!(
            error_message(r#"{"error_message":"Entry was not found.","error_code":141}"#),
            "Entry was not found."
        );
        assert_eq!(
            error_message(r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#),
            "Rate limit reached"
        );
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn long_error_is_truncated() {
        let long = "x".repeat(500);
        let message = error_message(&long);
        assert_eq!(message.chars().count(), MAX_ERROR_CHARS + 3);
        assert!(message.ends_with("..."));
    }
}
