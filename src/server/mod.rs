//! HTTP service exposing voice-session control and PDF summarization.
//!
//! Three endpoints:
//! - `POST /api/start-voicebot` - start the single voice session
//! - `POST /api/stop-voicebot` - stop it
//! - `POST /process_pdf` - extract a PDF's text and return a summary
//!
//! Start/stop respond `200 {"message"}` on success, `409 {"error"}` when
//! the session state machine rejects the transition, and `502 {"error"}`
//! when the voice-agent collaborator fails. `process_pdf` responds
//! `400 {"error"}` when the request carries no path.

use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::summarize::Summarizer;
use crate::voice::{VoiceController, VoiceError};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
        }
    }
}

impl ServerConfig {
    /// The socket address string this config binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shared handler state.
pub struct AppState {
    pub voice: VoiceController,
    pub summarizer: Arc<dyn Summarizer>,
}

#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct ProcessPdfRequest {
    #[serde(default)]
    pdf_path: String,
}

#[derive(Debug, Serialize)]
struct ProcessPdfResponse {
    summary: String,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/start-voicebot", post(start_voicebot))
        .route("/api/stop-voicebot", post(stop_voicebot))
        .route("/process_pdf", post(process_pdf))
        .with_state(state)
}

fn voice_error_response(err: VoiceError) -> (StatusCode, Json<ErrorBody>) {
    let status = match &err {
        VoiceError::InvalidState(_) => StatusCode::CONFLICT,
        VoiceError::Remote { .. } | VoiceError::Http(_) => StatusCode::BAD_GATEWAY,
    };
    warn!(%err, "voice session request rejected");
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

async fn start_voicebot(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageBody>, (StatusCode, Json<ErrorBody>)> {
    state
        .voice
        .start_session()
        .await
        .map_err(voice_error_response)?;
    Ok(Json(MessageBody {
        message: "Voicebot started".to_string(),
    }))
}

async fn stop_voicebot(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageBody>, (StatusCode, Json<ErrorBody>)> {
    state
        .voice
        .stop_session()
        .await
        .map_err(voice_error_response)?;
    Ok(Json(MessageBody {
        message: "Voicebot stopped".to_string(),
    }))
}

async fn process_pdf(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProcessPdfRequest>,
) -> Result<Json<ProcessPdfResponse>, (StatusCode, Json<ErrorBody>)> {
    if request.pdf_path.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "pdf_path is required".to_string(),
            }),
        ));
    }

    let text = crate::pdf::extract_text(Path::new(&request.pdf_path)).map_err(|e| {
        error!(%e, "PDF extraction failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: e.to_string(),
            }),
        )
    })?;

    let summary = state.summarizer.summarize(&text).await.map_err(|e| {
        error!(%e, "summarization failed");
        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorBody {
                error: e.to_string(),
            }),
        )
    })?;

    Ok(Json(ProcessPdfResponse { summary }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::{SummarizeError, SummarizeResult};
    use crate::voice::{AssistantConfig, VoiceAgent, VoiceResult};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct OkAgent;

    #[async_trait]
    impl VoiceAgent for OkAgent {
        async fn start(&self, _config: &AssistantConfig) -> VoiceResult<()> {
            Ok(())
        }
        async fn stop(&self) -> VoiceResult<()> {
            Ok(())
        }
    }

    struct EchoSummarizer;

    #[async_trait]
    impl Summarizer for EchoSummarizer {
        async fn summarize(&self, text: &str) -> SummarizeResult<String> {
            if text.is_empty() {
                return Err(SummarizeError::EmptyResponse);
            }
            Ok(format!("summary of {} chars", text.len()))
        }
    }

    fn app() -> Router {
        let state = Arc::new(AppState {
            voice: VoiceController::new(Box::new(OkAgent), AssistantConfig::default()),
            summarizer: Arc::new(EchoSummarizer),
        });
        router(state)
    }

    async fn post_json(
        app: &Router,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.unwrap_or("{}").to_string()))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn start_then_stop_responds_with_messages() {
        let app = app();

        let (status, body) = post_json(&app, "/api/start-voicebot", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Voicebot started");

        let (status, body) = post_json(&app, "/api/stop-voicebot", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Voicebot stopped");
    }

    #[tokio::test]
    async fn double_start_conflicts() {
        let app = app();

        let (status, _) = post_json(&app, "/api/start-voicebot", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = post_json(&app, "/api/start-voicebot", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("already active"));
    }

    #[tokio::test]
    async fn stop_without_session_conflicts() {
        let app = app();
        let (status, body) = post_json(&app, "/api/stop-voicebot", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("no active session"));
    }

    #[tokio::test]
    async fn process_pdf_requires_a_path() {
        let app = app();
        let (status, body) = post_json(&app, "/process_pdf", Some("{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("pdf_path"));
    }

    #[tokio::test]
    async fn process_pdf_with_missing_file_fails_cleanly() {
        let app = app();
        let (status, body) = post_json(
            &app,
            "/process_pdf",
            Some(r#"{"pdf_path": "/nonexistent/paper.pdf"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("cannot read PDF"));
    }
}
