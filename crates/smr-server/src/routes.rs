//! HTTP surface
//!
//! | Method | Path                 | Body                    | Reply              |
//! |--------|----------------------|-------------------------|--------------------|
//! | GET    | `/health`            |                         | status and version |
//! | POST   | `/api/parse`         | [`ParseRequest`]        | `ParsedCommand`    |
//! | POST   | `/api/score`         | [`ScoreRequest`]        | [`ScoreResponse`]  |
//! | POST   | `/api/validate`      | [`ValidateRequest`]     | `ComplianceVerdict`|
//! | POST   | `/api/replace`       | `ReplaceRequest`        | `ReplaceOutcome`   |
//! | POST   | `/api/smart-suggest` | `SmartSuggestRequest`   | `SuggestPreview`   |
//! | POST   | `/api/smart-replace` | `SmartReplaceRequest`   | `ReplaceOutcome`   |
//!
//! Failures reply `{"error": "...", "kind": "..."}` with the status from
//! [`ReplaceError::status_hint`]. Each request runs inside a span carrying a
//! fresh request id.

use serde::{Deserialize, Serialize};
use serde_json::json;
use smr_core::{
    ReplaceError, ReplaceRequest, ReplaceResult, ReplacementOrchestrator, SmartReplaceRequest,
    SmartSuggestRequest,
};
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Largest accepted request body
const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// Body of `/api/parse`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    /// Free-text instruction
    pub command: String,
}

/// Body of `/api/score`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    /// Candidate replacement
    #[serde(default)]
    pub suggestion: Option<String>,
    /// Surrounding text
    #[serde(default)]
    pub context: Option<String>,
    /// Text being replaced
    pub find_text: String,
}

/// Reply of `/api/score`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResponse {
    /// Confidence percentage
    pub confidence: u8,
}

/// Body of `/api/validate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    /// Candidate text
    pub text: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: String,
    kind: &'a str,
}

/// All routes, with rejections rendered as JSON errors
pub fn routes(
    orchestrator: Arc<ReplacementOrchestrator>,
) -> impl Filter<Extract = (Response,), Error = Infallible> + Clone {
    let health = warp::path!("health")
        .and(warp::get())
        .map(|| warp::reply::json(&json!({"status": "ok", "version": crate::VERSION})).into_response());

    let parse = warp::path!("api" / "parse")
        .and(warp::post())
        .and(json_body())
        .and_then(|request: ParseRequest| traced("parse", async move {
            reply(Ok(smr_engine::parse(&request.command)))
        }));

    let score = warp::path!("api" / "score")
        .and(warp::post())
        .and(json_body())
        .and_then(|request: ScoreRequest| traced("score", async move {
            let confidence = smr_engine::score(
                request.suggestion.as_deref(),
                request.context.as_deref(),
                &request.find_text,
            );
            reply(Ok(ScoreResponse { confidence }))
        }));

    let validate = warp::path!("api" / "validate")
        .and(warp::post())
        .and(json_body())
        .and(with_orchestrator(orchestrator.clone()))
        .and_then(|request: ValidateRequest, orchestrator: Arc<ReplacementOrchestrator>| {
            traced("validate", async move {
                reply(orchestrator.check_compliance(&request.text).await)
            })
        });

    let replace = warp::path!("api" / "replace")
        .and(warp::post())
        .and(json_body())
        .and(with_orchestrator(orchestrator.clone()))
        .and_then(|request: ReplaceRequest, orchestrator: Arc<ReplacementOrchestrator>| {
            traced("replace", async move {
                reply(orchestrator.single_replace(&request).await)
            })
        });

    let smart_suggest = warp::path!("api" / "smart-suggest")
        .and(warp::post())
        .and(json_body())
        .and(with_orchestrator(orchestrator.clone()))
        .and_then(|request: SmartSuggestRequest, orchestrator: Arc<ReplacementOrchestrator>| {
            traced("smart_suggest", async move {
                reply(orchestrator.smart_suggest(&request).await)
            })
        });

    let smart_replace = warp::path!("api" / "smart-replace")
        .and(warp::post())
        .and(json_body())
        .and(with_orchestrator(orchestrator))
        .and_then(|request: SmartReplaceRequest, orchestrator: Arc<ReplacementOrchestrator>| {
            traced("smart_replace", async move {
                reply(orchestrator.smart_replace(&request).await)
            })
        });

    health
        .or(parse)
        .unify()
        .or(score)
        .unify()
        .or(validate)
        .unify()
        .or(replace)
        .unify()
        .or(smart_suggest)
        .unify()
        .or(smart_replace)
        .unify()
        .recover(handle_rejection)
        .unify()
}

fn with_orchestrator(
    orchestrator: Arc<ReplacementOrchestrator>,
) -> impl Filter<Extract = (Arc<ReplacementOrchestrator>,), Error = Infallible> + Clone {
    warp::any().map(move || orchestrator.clone())
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// Run a handler inside a request span
async fn traced<F>(route: &'static str, handler: F) -> Result<Response, Infallible>
where
    F: Future<Output = Response>,
{
    let span = tracing::info_span!("request", request_id = %Uuid::new_v4(), route);
    let response = handler.instrument(span.clone()).await;
    span.in_scope(|| tracing::debug!(status = response.status().as_u16(), "request done"));
    Ok(response)
}

fn reply<T: Serialize>(result: ReplaceResult<T>) -> Response {
    match result {
        Ok(value) => warp::reply::json(&value).into_response(),
        Err(err) => error_reply(&err),
    }
}

fn error_reply(err: &ReplaceError) -> Response {
    let status = StatusCode::from_u16(err.status_hint()).unwrap_or(StatusCode::BAD_GATEWAY);
    if status.is_server_error() {
        tracing::error!(error = %err, kind = err.kind(), "request failed");
    } else {
        tracing::warn!(error = %err, kind = err.kind(), "request rejected");
    }
    json_error(status, err.kind(), err.to_string())
}

fn json_error(status: StatusCode, kind: &str, error: String) -> Response {
    warp::reply::with_status(warp::reply::json(&ErrorBody { error, kind }), status).into_response()
}

async fn handle_rejection(rejection: Rejection) -> Result<Response, Infallible> {
    let (status, kind, message) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "not_found", "no such route".to_string())
    } else if let Some(err) = rejection.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, "bad_request", err.to_string())
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "bad_request", "request body too large".to_string())
    } else if rejection.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "bad_request",
            "expected application/json".to_string(),
        )
    } else if rejection.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "bad_request", "content length required".to_string())
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "method_not_allowed",
            "method not allowed".to_string(),
        )
    } else {
        tracing::error!(?rejection, "unhandled rejection");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "internal error".to_string(),
        )
    };
    Ok(json_error(status, kind, message))
}
