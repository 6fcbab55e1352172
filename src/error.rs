//! Error types for the chat endpoint
//!
//! `ChatError` covers failures at the request boundary and while building the
//! rule table. `HandlerError` covers a single handler invocation; it never
//! leaves the resolver, which turns it into the handler's apology string.

use reqwest::StatusCode;
use thiserror::Error;

/// Boundary and construction errors
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Invalid input.")]
    InvalidInput,

    #[error("Invalid intent pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors raised by an intent handler
#[derive(Error, Debug)]
pub enum HandlerError {
    /// A required credential is absent; no call was attempted
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// The upstream service reported that the subject does not exist
    #[error("'{0}' was not found")]
    NotFound(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {0}")]
    Status(StatusCode),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Upstream returned no results")]
    Empty,
}

impl HandlerError {
    /// Whether the failure came from the upstream service rather than local config
    pub fn is_upstream(&self) -> bool {
        !matches!(self, HandlerError::NotConfigured(_))
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
pub type HandlerResult<T> = Result<T, HandlerError>;
