//! Intent Rules
//!
//! A [`RuleSet`] is an ordered list of case-insensitive patterns. Order is
//! priority: when several patterns match a message the earliest one wins, so
//! the table is a `Vec` and never a map.

use regex::{Captures, Regex};
use std::sync::Arc;

use crate::error::{ChatError, ChatResult};
use crate::handlers::{Handlers, IntentHandler};

pub const GREETING: &str = "Hello! How can I help you?";
pub const SMALL_TALK: &str = "I'm just a bot, but I'm doing great! How about you?";
pub const INTRODUCTION: &str = "I'm an advanced chatbot. You can call me ChatBot!";
pub const FAREWELL: &str = "Goodbye! Have a great day!";

/// Capture groups of the rule that matched
///
/// Group 0 is the whole match. Owned so it can cross an `.await`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentMatch {
    groups: Vec<Option<String>>,
}

impl IntentMatch {
    pub fn new(groups: Vec<Option<String>>) -> Self {
        Self { groups }
    }

    pub fn from_captures(captures: &Captures<'_>) -> Self {
        Self {
            groups: captures
                .iter()
                .map(|g| g.map(|m| m.as_str().to_string()))
                .collect(),
        }
    }

    /// The full matched text
    pub fn matched(&self) -> &str {
        self.group(0).unwrap_or_default()
    }

    /// A capture group, `None` if absent or did not participate
    pub fn group(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(|g| g.as_deref())
    }
}

/// What to do when a rule matches
#[derive(Clone)]
pub enum IntentAction {
    /// Fixed reply text
    Reply(String),
    /// Delegate to a handler
    Handler(Arc<dyn IntentHandler>),
}

impl std::fmt::Debug for IntentAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntentAction::Reply(text) => f.debug_tuple("Reply").field(text).finish(),
            IntentAction::Handler(handler) => f.debug_tuple("Handler").field(&handler.name()).finish(),
        }
    }
}

/// A compiled (pattern, action) pair
#[derive(Debug, Clone)]
pub struct IntentRule {
    pattern: String,
    regex: Regex,
    action: IntentAction,
}

impl IntentRule {
    /// Compile a pattern; matching is always case-insensitive
    pub fn new(pattern: &str, action: IntentAction) -> ChatResult<Self> {
        let regex = Regex::new(&format!("(?i){}", pattern)).map_err(|source| {
            ChatError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            action,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn action(&self) -> &IntentAction {
        &self.action
    }

    /// Substring search, not a full match
    pub fn captures(&self, input: &str) -> Option<IntentMatch> {
        self.regex
            .captures(input)
            .map(|c| IntentMatch::from_captures(&c))
    }
}

/// Ordered intent table
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<IntentRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule with a fixed reply
    pub fn reply(self, pattern: &str, text: &str) -> ChatResult<Self> {
        self.push(pattern, IntentAction::Reply(text.to_string()))
    }

    /// Append a rule that delegates to a handler
    pub fn handler(self, pattern: &str, handler: Arc<dyn IntentHandler>) -> ChatResult<Self> {
        self.push(pattern, IntentAction::Handler(handler))
    }

    fn push(mut self, pattern: &str, action: IntentAction) -> ChatResult<Self> {
        self.rules.push(IntentRule::new(pattern, action)?);
        Ok(self)
    }

    /// The standard table, in its declared priority order
    pub fn standard(handlers: &Handlers) -> ChatResult<Self> {
        RuleSet::new()
            .reply(r"hello|hi|hey", GREETING)?
            .reply(r"how are you|how's it going|how do you do", SMALL_TALK)?
            .reply(r"what's your name|who are you", INTRODUCTION)?
            .handler(
                r"tell me a joke|say something funny|joke",
                handlers.joke.clone(),
            )?
            .handler(r"weather in (.+)", handlers.weather.clone())?
            .handler(
                r"what's the time|tell me the time|what time is it|time",
                handlers.time.clone(),
            )?
            .handler(
                r"what's the date|tell me the date|what date is it|date",
                handlers.date.clone(),
            )?
            .handler(r"news|latest news|top headlines", handlers.news.clone())?
            .reply(r"bye|goodbye", FAREWELL)
    }

    /// First rule matching the input, with its captures
    pub fn first_match(&self, input: &str) -> Option<(&IntentRule, IntentMatch)> {
        self.rules
            .iter()
            .find_map(|rule| rule.captures(input).map(|m| (rule, m)))
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
