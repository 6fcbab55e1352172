//! News headlines from the Guardian content API

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{truncate_for_log, IntentHandler};
use crate::error::{HandlerError, HandlerResult};
use crate::intent::IntentMatch;

/// Key value shipped in sample `.env` files; treated as absent
pub const PLACEHOLDER_KEY: &str = "your_guardian_api_key";
pub const PAGE_SIZE: &str = "5";

pub const NEWS_NOT_CONFIGURED: &str =
    "Sorry, the Guardian API key is not configured on the server.";
pub const NEWS_EMPTY: &str = "Sorry, no news articles were found.";
pub const NEWS_UNAVAILABLE: &str = "Sorry, I couldn't fetch the news right now.";
pub const NEWS_ISSUE: &str = "Sorry, there was an issue fetching the news.";
pub const HEADLINES_PREFIX: &str = "Here are the latest news headlines: ";

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: Option<SearchResponse>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Option<Vec<Article>>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(rename = "webTitle")]
    web_title: String,
}

/// The credential if it is present and not the sample placeholder
pub fn usable_key(key: Option<&str>) -> Option<&str> {
    key.filter(|k| *k != PLACEHOLDER_KEY)
}

/// Fetches the latest five headlines
pub struct NewsHandler {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl NewsHandler {
    pub fn new(client: Client, url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            url: url.to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl IntentHandler for NewsHandler {
    fn name(&self) -> &str {
        "news"
    }

    async fn handle(&self, _intent: &IntentMatch) -> HandlerResult<String> {
        let api_key = usable_key(self.api_key.as_deref())
            .ok_or(HandlerError::NotConfigured("GUARDIAN_API_KEY"))?;

        debug!("Fetching headlines from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("api-key", api_key),
                ("show-fields", "headline"),
                ("page-size", PAGE_SIZE),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                "News service returned {}: {}",
                status,
                truncate_for_log(&body)
            );
            return Err(HandlerError::Status(status));
        }

        let envelope: SearchEnvelope = serde_json::from_str(&body).map_err(|e| {
            HandlerError::InvalidResponse(format!("{}: {}", e, truncate_for_log(&body)))
        })?;
        let articles = envelope
            .response
            .and_then(|r| r.results)
            .ok_or_else(|| HandlerError::InvalidResponse("missing response.results".to_string()))?;

        if articles.is_empty() {
            return Err(HandlerError::Empty);
        }

        let headlines: Vec<String> = articles.into_iter().map(|a| a.web_title).collect();
        Ok(format!("{}{}", HEADLINES_PREFIX, headlines.join(". ")))
    }

    fn recover(&self, error: &HandlerError) -> String {
        match error {
            HandlerError::NotConfigured(_) => NEWS_NOT_CONFIGURED,
            HandlerError::Empty => NEWS_EMPTY,
            HandlerError::Transport(_) => NEWS_ISSUE,
            _ => NEWS_UNAVAILABLE,
        }
        .to_string()
    }
}
