//! Chat Configuration
//!
//! Credentials, upstream endpoints and limits, read once at startup and passed
//! into each handler's constructor. Handlers never read the environment.

use std::time::Duration;

pub const DEFAULT_JOKE_URL: &str = "https://official-joke-api.appspot.com/random_joke";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_NEWS_URL: &str = "https://content.guardianapis.com/search";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_PORT: u16 = 5000;

/// Runtime configuration for the chat endpoint
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// OpenWeatherMap API key
    pub weather_api_key: Option<String>,
    /// Guardian content API key
    pub news_api_key: Option<String>,
    /// Gemini API key
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// Timeout applied to every outbound call
    pub http_timeout: Duration,
    pub joke_url: String,
    pub weather_url: String,
    pub news_url: String,
    pub gemini_base_url: String,
    pub port: u16,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            news_api_key: None,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            joke_url: DEFAULT_JOKE_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            news_url: DEFAULT_NEWS_URL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_URL.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ChatConfig {
    /// Create from process environment variables
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary key lookup
    ///
    /// Empty or whitespace-only values count as absent. Unparseable numbers
    /// fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let http_timeout = get("CHAT_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);

        let port = get("PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        Self {
            weather_api_key: get("OPENWEATHERMAP_API_KEY"),
            news_api_key: get("GUARDIAN_API_KEY"),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            http_timeout,
            joke_url: get("JOKE_API_URL").unwrap_or(defaults.joke_url),
            weather_url: get("WEATHER_API_URL").unwrap_or(defaults.weather_url),
            news_url: get("GUARDIAN_API_URL").unwrap_or(defaults.news_url),
            gemini_base_url: get("GEMINI_API_URL").unwrap_or(defaults.gemini_base_url),
            port,
        }
    }

    pub fn weather_enabled(&self) -> bool {
        self.weather_api_key.is_some()
    }

    pub fn news_enabled(&self) -> bool {
        crate::handlers::news::usable_key(self.news_api_key.as_deref()).is_some()
    }

    pub fn ai_enabled(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}
