//! OpenAI-compatible chat completions as a [`SuggestionProvider`]

use crate::config::{ConfigError, SuggestionsConfig};
use crate::http::{build_client, endpoint, parse_base, read_json, transport};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use smr_core::{SuggestionProvider, UpstreamError};

const SYSTEM_PROMPT: &str =
    "You rewrite short spans of website copy. Answer with the replacement text only.";

/// Upper bound on generated tokens; suggestions are a few words
const MAX_TOKENS: u32 = 64;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions client
pub struct OpenAiSuggestionProvider {
    http: Client,
    url: Url,
    auth_header: Option<String>,
    model: String,
    temperature: f64,
}

impl OpenAiSuggestionProvider {
    /// Create provider from configuration
    ///
    /// A missing API key is allowed here; every generation then fails and
    /// previews report the suggestion as unavailable.
    ///
    /// # Errors
    /// `Invalid` for a bad base URL
    pub fn new(config: &SuggestionsConfig) -> Result<Self, ConfigError> {
        let base = parse_base(&config.base_url, "suggestions.base_url")?;
        Ok(Self {
            http: build_client(config.timeout_secs),
            url: endpoint(&base, &["chat", "completions"]),
            auth_header: config
                .api_key
                .as_ref()
                .map(|key| format!("Bearer {}", key.expose())),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: MAX_TOKENS,
        }
    }
}

impl std::fmt::Debug for OpenAiSuggestionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSuggestionProvider")
            .field("url", &self.url.as_str())
            .field("model", &self.model)
            .field("has_key", &self.auth_header.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SuggestionProvider for OpenAiSuggestionProvider {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        let auth_header = self
            .auth_header
            .as_ref()
            .ok_or_else(|| UpstreamError::Provider("suggestion API key not set".into()))?;

        let response = self
            .http
            .post(self.url.clone())
            .header("Authorization", auth_header)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(transport)?;

        let body = read_json(response).await.map_err(|err| match err {
            UpstreamError::Decode(_) | UpstreamError::Transport(_) => err,
            other => UpstreamError::Provider(other.to_string()),
        })?;
        let chat: ChatResponse =
            serde_json::from_value(body).map_err(|e| UpstreamError::Decode(e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| UpstreamError::Provider("no choices in response".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_shape() {
        let provider = OpenAiSuggestionProvider::new(&SuggestionsConfig::default()).unwrap();
        let request = serde_json::to_value(provider.build_request("Suggest a name")).unwrap();
        assert_eq!(request["model"], "gpt-4o-mini");
        assert_eq!(request["messages"][0]["role"], "system");
        assert_eq!(request["messages"][1]["content"], "Suggest a name");
        assert_eq!(request["max_tokens"], 64);
        assert_eq!(provider.url.as_str(), "https://api.openai.com/v1/chat/completions");
    }

    #[tokio::test]
    async fn missing_key_is_provider_error() {
        let provider = OpenAiSuggestionProvider::new(&SuggestionsConfig::default()).unwrap();
        let err = provider.generate("anything").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Provider(_)));
    }
}
