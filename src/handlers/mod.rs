//! Intent Handlers
//!
//! Each handler produces the reply for one intent. Failures are returned as
//! [`HandlerError`] and converted into a user-facing apology by the same
//! handler's [`IntentHandler::recover`], so the failure policy of every
//! handler sits next to the call that can fail.

pub mod clock;
pub mod gemini;
pub mod joke;
pub mod news;
pub mod song;
pub mod weather;

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

use crate::config::ChatConfig;
use crate::error::{ChatError, ChatResult, HandlerError, HandlerResult};
use crate::intent::IntentMatch;

pub use clock::{Clock, DateHandler, SystemClock, TimeHandler};
pub use gemini::GeminiClient;
pub use joke::JokeHandler;
pub use news::NewsHandler;
pub use song::song_link;
pub use weather::WeatherHandler;

/// A unit of logic producing the reply for a matched intent
#[async_trait]
pub trait IntentHandler: Send + Sync {
    /// Handler name for logging
    fn name(&self) -> &str;

    /// Produce the reply text for a match
    async fn handle(&self, intent: &IntentMatch) -> HandlerResult<String>;

    /// Convert a failure from `handle` into the reply shown to the user
    fn recover(&self, error: &HandlerError) -> String;
}

/// Generative-text backend used when no intent matched
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send raw user text and return the generated reply
    async fn generate(&self, prompt: &str) -> HandlerResult<String>;

    /// Get the model name for logging
    fn model_name(&self) -> &str;
}

/// The handler set referenced by the standard rule table
#[derive(Clone)]
pub struct Handlers {
    pub joke: Arc<dyn IntentHandler>,
    pub weather: Arc<dyn IntentHandler>,
    pub time: Arc<dyn IntentHandler>,
    pub date: Arc<dyn IntentHandler>,
    pub news: Arc<dyn IntentHandler>,
}

impl Handlers {
    /// Build the networked handlers from configuration
    pub fn from_config(config: &ChatConfig) -> ChatResult<Self> {
        let client = http_client(config)?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        Ok(Self {
            joke: Arc::new(JokeHandler::new(client.clone(), &config.joke_url)),
            weather: Arc::new(WeatherHandler::new(
                client.clone(),
                &config.weather_url,
                config.weather_api_key.clone(),
            )),
            time: Arc::new(TimeHandler::new(clock.clone())),
            date: Arc::new(DateHandler::new(clock)),
            news: Arc::new(NewsHandler::new(
                client,
                &config.news_url,
                config.news_api_key.clone(),
            )),
        })
    }
}

/// Shared outbound HTTP client with the configured timeout
pub fn http_client(config: &ChatConfig) -> ChatResult<Client> {
    Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(ChatError::HttpClient)
}

/// Clip an upstream body for log lines
pub(crate) fn truncate_for_log(body: &str) -> &str {
    const LIMIT: usize = 200;
    if body.len() <= LIMIT {
        return body;
    }
    let mut end = LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
