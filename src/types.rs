//! Request and response shapes for the chat endpoint

use serde::{Deserialize, Serialize};

/// The reply descriptor returned for every message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatResponse {
    /// Plain text reply
    Text { content: String },
    /// Link to a video search for a requested song
    YoutubeLink { text: String, url: String },
}

impl ChatResponse {
    pub fn text(content: impl Into<String>) -> Self {
        ChatResponse::Text {
            content: content.into(),
        }
    }

    /// Text shown to the user, regardless of variant
    pub fn display_text(&self) -> &str {
        match self {
            ChatResponse::Text { content } => content,
            ChatResponse::YoutubeLink { text, .. } => text,
        }
    }
}

/// Inbound `POST /chat` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Outbound envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: ChatResponse,
}
