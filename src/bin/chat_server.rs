//! Chat server binary
//!
//! ```bash
//! OPENWEATHERMAP_API_KEY=... GUARDIAN_API_KEY=... GEMINI_API_KEY=... \
//!   cargo run --bin chat_server
//! ```

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use intent_chat::api::{create_router, AppState};
use intent_chat::{ChatConfig, IntentResolver};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("intent_chat=info,chat_server=info,tower_http=debug")),
        )
        .init();

    let config = ChatConfig::from_env();

    if !config.weather_enabled() {
        warn!("OPENWEATHERMAP_API_KEY not set - weather replies disabled");
    }
    if !config.news_enabled() {
        warn!("GUARDIAN_API_KEY not set - news replies disabled");
    }
    if !config.ai_enabled() {
        warn!("GEMINI_API_KEY not set - AI fallback disabled");
    }

    let resolver = IntentResolver::from_config(&config).context("Failed to build intent resolver")?;
    info!("Loaded {} intent rules", resolver.rules().len());

    let app = create_router(AppState::new(resolver, &config));

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
