//! Suggestion provider against a mock chat completions endpoint

use serde_json::json;
use smr_core::{request_suggestion, Suggestion, SuggestionProvider, UpstreamError};
use smr_server::config::{Secret, SuggestionsConfig};
use smr_server::OpenAiSuggestionProvider;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> OpenAiSuggestionProvider {
    OpenAiSuggestionProvider::new(&SuggestionsConfig {
        base_url: server.uri(),
        api_key: Some(Secret::new("sk-test")),
        ..SuggestionsConfig::default()
    })
    .unwrap()
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn generate_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "gpt-4o-mini", "max_tokens": 64})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Globex")))
        .expect(1)
        .mount(&server)
        .await;

    let text = provider(&server)
        .generate("Suggest a replacement for \"Acme\"")
        .await
        .unwrap();
    assert_eq!(text, "Globex");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "Suggest a replacement for \"Acme\"");
}

#[tokio::test]
async fn quoted_reply_is_cleaned_into_suggestion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("\"Initech\"\nBecause it fits.")))
        .mount(&server)
        .await;

    let provider = provider(&server);
    let suggestion = request_suggestion(&provider, "prompt").await;
    assert_eq!(suggestion, Suggestion::Generated("Initech".into()));
}

#[tokio::test]
async fn api_error_becomes_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "Rate limit reached", "type": "requests"}
        })))
        .mount(&server)
        .await;

    let provider = provider(&server);
    let err = provider.generate("prompt").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Provider(ref m) if m.contains("Rate limit reached")), "{err}");

    assert_eq!(request_suggestion(&provider, "prompt").await, Suggestion::Unavailable);
}

#[tokio::test]
async fn empty_choices_are_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let provider = provider(&server);
    assert!(provider.generate("prompt").await.is_err());
    assert_eq!(request_suggestion(&provider, "prompt").await, Suggestion::Unavailable);
}
