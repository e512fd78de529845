//! HTTP API gateway for MoodMate.
//!
//! Exposes the single client-facing endpoint `POST /chat` plus a health
//! check. Built on Axum; every failure path answers with a well-formed
//! JSON body — the client UI never sees a raw error or a dropped
//! connection.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use moodmate_core::affect::AffectLabel;
use moodmate_core::error::TurnError;
use moodmate_engine::{TurnOrchestrator, FALLBACK_REPLY};

/// Shared application state for the gateway.
pub struct GatewayState {
    pub orchestrator: TurnOrchestrator,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - Permissive CORS (the endpoint is consumed by a browser UI)
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(config: moodmate_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let completion = Arc::new(moodmate_clients::completion_from_config(&config));
    let classifier = Arc::new(moodmate_clients::classifier_from_config(&config));
    let store = moodmate_session::build_from_config(&config);

    let orchestrator =
        TurnOrchestrator::new(completion, classifier, store).with_config(&config);

    let app = build_router(Arc::new(GatewayState { orchestrator }));

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    user_id: Option<String>,

    #[serde(default)]
    region: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatResponse {
    reply: String,
    user_mood: AffectLabel,
    bot_mood: AffectLabel,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let (Some(message), Some(user_id)) = (payload.message, payload.user_id) else {
        return validation_response();
    };

    let result = state
        .orchestrator
        .handle_turn(&user_id, &message, payload.region.as_deref())
        .await;

    match result {
        Ok(turn) => (
            StatusCode::OK,
            json_body(&ChatResponse {
                reply: turn.reply,
                user_mood: turn.user_mood,
                bot_mood: turn.bot_mood,
            }),
        ),
        Err(TurnError::Validation) => validation_response(),
        Err(TurnError::Generation { user_mood, .. }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json_body(&ChatResponse {
                reply: FALLBACK_REPLY.into(),
                user_mood,
                bot_mood: AffectLabel::Neutral,
            }),
        ),
        // A reply existed but could not be recorded
        Err(TurnError::Persistence { user_mood, .. }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json_body(&ChatResponse {
                reply: FALLBACK_REPLY.into(),
                user_mood,
                bot_mood: AffectLabel::Sadness,
            }),
        ),
    }
}

fn validation_response() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        json_body(&ErrorResponse {
            error: TurnError::Validation.to_string(),
        }),
    )
}

fn json_body<T: Serialize>(value: &T) -> Json<serde_json::Value> {
    Json(serde_json::to_value(value).unwrap_or_else(|_| serde_json::json!({})))
}
