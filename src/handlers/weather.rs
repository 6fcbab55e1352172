//! Weather lookup
//!
//! Current conditions for a city from an OpenWeatherMap-compatible endpoint,
//! always in metric units.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{truncate_for_log, IntentHandler};
use crate::error::{HandlerError, HandlerResult};
use crate::intent::IntentMatch;

pub const WEATHER_NOT_CONFIGURED: &str =
    "Sorry, the weather service is not configured on the server.";
pub const WEATHER_ISSUE: &str = "Sorry, there was an issue fetching the weather.";

#[derive(Debug, Deserialize)]
struct WeatherReport {
    weather: Vec<WeatherCondition>,
    main: WeatherMain,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    /// Kept as the service's own number so `15` and `15.0` render as sent
    temp: serde_json::Number,
}

/// Looks up the weather for the city captured by the intent pattern
pub struct WeatherHandler {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl WeatherHandler {
    pub fn new(client: Client, url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            url: url.to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl IntentHandler for WeatherHandler {
    fn name(&self) -> &str {
        "weather"
    }

    async fn handle(&self, intent: &IntentMatch) -> HandlerResult<String> {
        let city = intent.group(1).map(str::trim).unwrap_or_default();
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(HandlerError::NotConfigured("OPENWEATHERMAP_API_KEY"))?;

        if city.is_empty() {
            return Err(HandlerError::NotFound(String::new()));
        }

        debug!("Fetching weather for '{}' from {}", city, self.url);

        let response = self
            .client
            .get(&self.url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                "Weather service returned {} for '{}': {}",
                status,
                city,
                truncate_for_log(&body)
            );
            return Err(HandlerError::NotFound(city.to_string()));
        }

        let report: WeatherReport = serde_json::from_str(&body).map_err(|e| {
            HandlerError::InvalidResponse(format!("{}: {}", e, truncate_for_log(&body)))
        })?;
        let condition = report
            .weather
            .first()
            .ok_or_else(|| HandlerError::InvalidResponse("no weather conditions".to_string()))?;

        Ok(format!(
            "The weather in {} is {} with a temperature of {}°C.",
            title_case(city),
            condition.description,
            report.main.temp
        ))
    }

    fn recover(&self, error: &HandlerError) -> String {
        match error {
            HandlerError::NotConfigured(_) => WEATHER_NOT_CONFIGURED.to_string(),
            HandlerError::NotFound(city) => {
                format!("Sorry, I couldn't find the weather for {}.", city)
            }
            _ => WEATHER_ISSUE.to_string(),
        }
    }
}

/// Upper-case the first letter of every word, lower-case the rest
///
/// A word starts at any character that does not follow a cased letter, so
/// `"o'neil"` becomes `"O'Neil"` and `"東京x"` becomes `"東京X"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_cased = false;
    for c in text.chars() {
        if previous_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_cased = c.is_lowercase() || c.is_uppercase();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn city_match(city: &str) -> IntentMatch {
        IntentMatch::new(vec![Some(format!("weather in {}", city)), Some(city.to_string())])
    }

    fn handler_for(server: &MockServer) -> WeatherHandler {
        WeatherHandler::new(
            Client::new(),
            &format!("{}/data/2.5/weather", server.uri()),
            Some("test-key".to_string()),
        )
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("london"), "London");
        assert_eq!(title_case("new york"), "New York");
        assert_eq!(title_case("o'neil"), "O'Neil");
        assert_eq!(title_case("SAN josé"), "San José");
    }

    #[test]
    fn test_title_case_after_uncased_letters() {
        assert_eq!(title_case("東京x"), "東京X");
        assert_eq!(title_case("tel aviv-yafo"), "Tel Aviv-Yafo");
        assert_eq!(title_case("route 66th"), "Route 66Th");
    }

    #[tokio::test]
    async fn test_weather_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "new york"))
            .and(query_param("appid", "test-key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cod": 200,
                "weather": [{"main": "Clouds", "description": "scattered clouds"}],
                "main": {"temp": 18.52, "humidity": 60}
            })))
            .mount(&server)
            .await;

        let handler = handler_for(&server);
        let reply = handler.handle(&city_match(" new york ")).await.unwrap();
        assert_eq!(
            reply,
            "The weather in New York is scattered clouds with a temperature of 18.52°C."
        );
    }

    #[tokio::test]
    async fn test_weather_city_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "cod": "404",
                "message": "city not found"
            })))
            .mount(&server)
            .await;

        let handler = handler_for(&server);
        let err = handler.handle(&city_match("atlantis")).await.unwrap_err();
        assert!(matches!(err, HandlerError::NotFound(ref c) if c == "atlantis"));
        assert_eq!(
            handler.recover(&err),
            "Sorry, I couldn't find the weather for atlantis."
        );
    }

    #[tokio::test]
    async fn test_weather_transport_failure() {
        let handler = WeatherHandler::new(
            Client::new(),
            "http://127.0.0.1:1/data/2.5/weather",
            Some("test-key".to_string()),
        );
        let err = handler.handle(&city_match("paris")).await.unwrap_err();
        assert!(matches!(err, HandlerError::Transport(_)));
        assert_eq!(handler.recover(&err), WEATHER_ISSUE);
    }

    #[tokio::test]
    async fn test_weather_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "weather": [],
                "main": {"temp": 3}
            })))
            .mount(&server)
            .await;

        let handler = handler_for(&server);
        let err = handler.handle(&city_match("oslo")).await.unwrap_err();
        assert!(matches!(err, HandlerError::InvalidResponse(_)));
        assert_eq!(handler.recover(&err), WEATHER_ISSUE);
    }

    #[tokio::test]
    async fn test_weather_without_key_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let handler = WeatherHandler::new(Client::new(), &server.uri(), None);
        let err = handler.handle(&city_match("rome")).await.unwrap_err();
        assert!(matches!(err, HandlerError::NotConfigured(_)));
        assert_eq!(handler.recover(&err), WEATHER_NOT_CONFIGURED);
    }
}
