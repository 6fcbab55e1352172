//! Intent Resolver
//!
//! Single pass per message:
//! 1. `play <song>` shortcut, checked before any rule
//! 2. ordered rule scan over the lower-cased message, first match wins
//! 3. generative-AI fallback with the original message

use std::sync::Arc;
use tracing::{debug, warn};

use super::rules::{IntentAction, RuleSet};
use crate::config::ChatConfig;
use crate::error::{ChatError, ChatResult};
use crate::handlers::gemini::{AI_APOLOGY, AI_NOT_CONFIGURED};
use crate::handlers::{song_link, GeminiClient, Handlers, TextGenerator};
use crate::types::ChatResponse;

const PLAY_PREFIX: &str = "play ";

/// Accept a message at the request boundary
///
/// Missing, empty and whitespace-only messages are all invalid input.
pub fn validate_message(message: Option<&str>) -> ChatResult<&str> {
    match message {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ChatError::InvalidInput),
    }
}

/// Song name after a case-insensitive `play ` prefix, trimmed
fn song_request(input: &str) -> Option<&str> {
    let head = input.get(..PLAY_PREFIX.len())?;
    if head.eq_ignore_ascii_case(PLAY_PREFIX) {
        Some(input[PLAY_PREFIX.len()..].trim())
    } else {
        None
    }
}

/// Maps a message to a response descriptor
pub struct IntentResolver {
    rules: RuleSet,
    fallback: Option<Arc<dyn TextGenerator>>,
}

impl IntentResolver {
    pub fn new(rules: RuleSet, fallback: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { rules, fallback }
    }

    /// Standard rule table and Gemini fallback built from configuration
    pub fn from_config(config: &ChatConfig) -> ChatResult<Self> {
        let handlers = Handlers::from_config(config)?;
        let rules = RuleSet::standard(&handlers)?;
        let fallback = GeminiClient::from_config(config)?
            .map(|client| Arc::new(client) as Arc<dyn TextGenerator>);

        Ok(Self::new(rules, fallback))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Resolve a message into a reply; never fails
    pub async fn resolve(&self, user_input: &str) -> ChatResponse {
        if let Some(song) = song_request(user_input) {
            debug!("Song request for '{}'", song);
            return song_link(song);
        }

        let normalized = user_input.to_lowercase();

        let Some((rule, intent)) = self.rules.first_match(&normalized) else {
            return self.fallback(user_input).await;
        };

        debug!(
            "Matched intent pattern '{}' on '{}'",
            rule.pattern(),
            intent.matched()
        );

        match rule.action() {
            IntentAction::Reply(text) => ChatResponse::text(text.as_str()),
            IntentAction::Handler(handler) => match handler.handle(&intent).await {
                Ok(reply) => ChatResponse::text(reply),
                Err(e) => {
                    if e.is_upstream() {
                        warn!("Handler '{}' failed: {}", handler.name(), e);
                    } else {
                        debug!("Handler '{}' unavailable: {}", handler.name(), e);
                    }
                    ChatResponse::text(handler.recover(&e))
                }
            },
        }
    }

    async fn fallback(&self, user_input: &str) -> ChatResponse {
        let Some(generator) = &self.fallback else {
            debug!("No intent matched and no AI backend configured");
            return ChatResponse::text(AI_NOT_CONFIGURED);
        };

        debug!("No intent matched, asking {}", generator.model_name());

        match generator.generate(user_input).await {
            Ok(reply) => ChatResponse::text(reply),
            Err(e) => {
                warn!("AI fallback failed: {}", e);
                ChatResponse::text(AI_APOLOGY)
            }
        }
    }
}
