//! REST API for the chat endpoint
//!
//! - `POST /chat` - resolve one message
//! - `GET /api/health` - liveness plus which upstream features are configured

mod routes;

pub use routes::{create_router, AppState, HealthStatus};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ChatError;
use crate::types::{ChatReply, ChatResponse};

/// 400 with the structured `Invalid input.` reply
pub(crate) fn invalid_input() -> Response {
    let body = ChatReply {
        response: ChatResponse::text(ChatError::InvalidInput.to_string()),
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}
