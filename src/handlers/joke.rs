//! Joke fetcher

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{truncate_for_log, IntentHandler};
use crate::error::{HandlerError, HandlerResult};
use crate::intent::IntentMatch;

pub const JOKE_APOLOGY: &str = "Sorry, I couldn't fetch a joke right now.";

#[derive(Debug, Deserialize)]
struct Joke {
    setup: String,
    punchline: String,
}

/// Fetches a random setup/punchline joke
pub struct JokeHandler {
    client: Client,
    url: String,
}

impl JokeHandler {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl IntentHandler for JokeHandler {
    fn name(&self) -> &str {
        "joke"
    }

    async fn handle(&self, _intent: &IntentMatch) -> HandlerResult<String> {
        debug!("Fetching joke from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HandlerError::Status(status));
        }

        let body = response.text().await?;
        let joke: Joke = serde_json::from_str(&body).map_err(|e| {
            HandlerError::InvalidResponse(format!("{}: {}", e, truncate_for_log(&body)))
        })?;

        Ok(format!("{}... {}", joke.setup, joke.punchline))
    }

    fn recover(&self, _error: &HandlerError) -> String {
        JOKE_APOLOGY.to_string()
    }
}
