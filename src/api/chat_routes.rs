//! Chat API endpoints
//!
//! - `POST /chat`     run one command message
//! - `POST /webhook`  accept ClickUp webhook deliveries (logged only)
//! - `GET  /health`   liveness probe

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

use crate::commands::CommandInterpreter;

#[derive(Clone)]
pub struct ChatState {
    interpreter: Arc<CommandInterpreter>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// POST /chat
///
/// Command failures are still `200 OK`; only a missing message is a client
/// error.
async fn chat(State(state): State<ChatState>, body: Option<Json<ChatRequest>>) -> Response {
    let message = body
        .and_then(|Json(req)| req.message)
        .filter(|m| !m.trim().is_empty());

    let Some(message) = message else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Message required".to_string(),
            }),
        )
            .into_response();
    };

    let response = state.interpreter.process(&message).await;
    Json(response).into_response()
}

/// POST /webhook
async fn webhook(body: Option<Json<Value>>) -> StatusCode {
    match body {
        Some(Json(payload)) => {
            let event = payload
                .get("event")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            info!(event, "Received ClickUp webhook");
            debug!(payload = %payload, "Webhook payload");
        }
        None => info!("Received ClickUp webhook without a JSON body"),
    }
    StatusCode::OK
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Build the chat router with tracing and permissive CORS.
pub fn chat_router(interpreter: Arc<CommandInterpreter>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/webhook", post(webhook))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ChatState { interpreter })
}
