//! HTTP boundary for the chat service.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/chat` | One chat exchange: `{message, sessionId?, useHandbook?}` → `{reply, sources}` |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Failures return a non-2xx status with a body the chat widget can render
//! directly:
//!
//! ```json
//! { "error": "model_call_failed", "message": "...", "reply": "Sorry, I encountered an error. Please try again." }
//! ```
//!
//! A failed exchange never touches session memory.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the browser widget
//! can call the API from any host during development.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::chat::ChatEngine;
use crate::config::Config;
use crate::memory::DEFAULT_SESSION_ID;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    engine: Arc<ChatEngine>,
}

/// Starts the chat HTTP server.
///
/// Binds to `[server].bind` from the configuration and serves until the
/// process is terminated. The handbook index is loaded lazily on the
/// first chat request.
pub async fn run_server(config: &Config, engine: Arc<ChatEngine>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState { engine };

    let app = Router::new()
        .route("/chat", post(handle_chat))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    tracing::info!(bind = %bind_addr, "chat server listening");
    println!("Chat server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// Fallback reply shown to the user when the model call fails.
const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// JSON error body. `reply` carries a safe user-facing message so the
/// widget can render something even on failure.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    reply: String,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code,
            message: self.message,
            reply: FALLBACK_REPLY.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

/// Constructs a 502 error for model endpoint failures.
fn model_call_failed(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_GATEWAY,
        code: "model_call_failed".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// The crate version from `Cargo.toml`.
    version: String,
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /chat ============

/// JSON request body for `POST /chat`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest {
    message: String,
    /// Opaque conversation key; omitted means the shared default session.
    session_id: Option<String>,
    /// Whether to augment the prompt with handbook excerpts.
    #[serde(default = "default_use_handbook")]
    use_handbook: bool,
}

fn default_use_handbook() -> bool {
    true
}

/// JSON response body for `POST /chat`.
#[derive(Serialize)]
struct ChatResponse {
    reply: String,
    sources: Vec<String>,
}

/// Handler for `POST /chat`.
///
/// Runs one exchange through the [`ChatEngine`]. A blank message is a
/// client error; a model endpoint failure maps to 502 with the fallback
/// reply and leaves the session transcript unchanged.
async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if req.message.trim().is_empty() {
        return Err(bad_request("message must not be empty"));
    }

    let session_id = req
        .session_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SESSION_ID);

    let outcome = state
        .engine
        .respond(session_id, &req.message, req.use_handbook)
        .await
        .map_err(|e| {
            tracing::error!(session = session_id, error = %e, "chat exchange failed");
            model_call_failed(e.to_string())
        })?;

    Ok(Json(ChatResponse {
        reply: outcome.reply,
        sources: outcome.sources,
    }))
}
