//! Chat routes

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, warn};

use super::invalid_input;
use crate::config::ChatConfig;
use crate::intent::{validate_message, IntentResolver};
use crate::types::{ChatReply, ChatRequest};

// Application state
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<IntentResolver>,
    pub health: HealthStatus,
}

impl AppState {
    pub fn new(resolver: IntentResolver, config: &ChatConfig) -> Self {
        Self {
            resolver: Arc::new(resolver),
            health: HealthStatus::from_config(config),
        }
    }
}

/// Which credential-gated features are available; never the credentials
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub weather: bool,
    pub news: bool,
    pub ai: bool,
}

impl HealthStatus {
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            status: "ok",
            weather: config.weather_enabled(),
            news: config.news_enabled(),
            ai: config.ai_enabled(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/api/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.health)
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected chat body: {}", rejection);
            return invalid_input();
        }
    };

    let Ok(message) = validate_message(request.message.as_deref()) else {
        debug!("Rejected blank chat message");
        return invalid_input();
    };
    debug!("Chat message received ({} chars)", message.chars().count());

    let response = state.resolver.resolve(message).await;
    debug!("Replying: {}", response.display_text());
    Json(ChatReply { response }).into_response()
}
