//! Google Gemini API Client
//!
//! Generative-text fallback for messages no intent rule recognised. The raw
//! user text is sent as a single content part and the first candidate's text
//! is returned.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{truncate_for_log, TextGenerator};
use crate::config::ChatConfig;
use crate::error::{ChatResult, HandlerError, HandlerResult};

pub const AI_NOT_CONFIGURED: &str = "Sorry, the AI service is not configured on the server.";
pub const AI_APOLOGY: &str = "Sorry, I couldn't process your request right now.";

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

/// Gemini API request format
#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(client: Client, base_url: &str, model: &str, api_key: &str) -> HandlerResult<Self> {
        if api_key.is_empty() {
            return Err(HandlerError::NotConfigured("GEMINI_API_KEY"));
        }

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Create from configuration; `None` when no API key is set
    pub fn from_config(config: &ChatConfig) -> ChatResult<Option<Self>> {
        let Some(api_key) = config.gemini_api_key.as_deref() else {
            return Ok(None);
        };
        let client = super::http_client(config)?;
        Ok(Self::new(client, &config.gemini_base_url, &config.gemini_model, api_key).ok())
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    /// Pull the first candidate's first text part out of a response
    fn extract_text(response: GeminiResponse) -> HandlerResult<String> {
        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| HandlerError::InvalidResponse("No text in candidates".to_string()))?;

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> HandlerResult<String> {
        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        debug!("Sending request to Gemini API: {}", self.endpoint());

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        debug!("Gemini API response status: {}", status);

        if !status.is_success() {
            error!(
                "Gemini API error: {} - {}",
                status,
                truncate_for_log(&response_text)
            );
            return Err(HandlerError::Status(status));
        }

        let gemini_response: GeminiResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                error!("Failed to parse Gemini response: {}", e);
                HandlerError::InvalidResponse(e.to_string())
            })?;

        if let Some(usage) = &gemini_response.usage_metadata {
            info!(
                "Gemini API usage - Prompt: {:?} tokens, Response: {:?} tokens",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Self::extract_text(gemini_response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(Client::new(), &server.uri(), "gemini-1.5-flash", "test-key").unwrap()
    }

    #[test]
    fn test_gemini_client_empty_api_key() {
        let client = GeminiClient::new(Client::new(), "http://localhost", "m", "");
        assert!(matches!(client, Err(HandlerError::NotConfigured(_))));
    }

    #[test]
    fn test_from_config_without_key() {
        let client = GeminiClient::from_config(&ChatConfig::default()).unwrap();
        assert!(client.is_none());
    }

    #[test]
    fn test_from_config_with_key() {
        let config = ChatConfig {
            gemini_api_key: Some("k".to_string()),
            gemini_model: "gemini-pro".to_string(),
            ..ChatConfig::default()
        };
        let client = GeminiClient::from_config(&config).unwrap().unwrap();
        assert_eq!(client.model_name(), "gemini-pro");
    }

    #[tokio::test]
    async fn test_generate_returns_trimmed_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_json(serde_json::json!({
                "contents": [{"parts": [{"text": "What Is Rust?"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "  A systems language.\n"}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 5}
            })))
            .mount(&server)
            .await;

        let reply = client_for(&server).generate("What Is Rust?").await.unwrap();
        assert_eq!(reply, "A systems language.");
    }

    #[tokio::test]
    async fn test_quota_error_is_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"code": 429, "message": "Quota exceeded"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).generate("hi there").await.unwrap_err();
        assert!(matches!(err, HandlerError::Status(s) if s.as_u16() == 429));
    }

    #[tokio::test]
    async fn test_no_candidates_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).generate("blocked").await.unwrap_err();
        assert!(matches!(err, HandlerError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_blank_candidate_text_is_returned_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": " \n "}]}}]
            })))
            .mount(&server)
            .await;

        let reply = client_for(&server).generate("say nothing").await.unwrap();
        assert_eq!(reply, "");
    }
}
