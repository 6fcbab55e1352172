//! Intent Chat - conversational endpoint with ordered regex intent dispatch
//!
//! A user message is lower-cased, checked for the `play ` song shortcut,
//! scanned against an ordered [`intent::RuleSet`] and finally handed to the
//! generative-AI fallback when nothing matched.

pub mod config;
pub mod error;
pub mod handlers;
pub mod intent;
pub mod types;

#[cfg(feature = "server")]
pub mod api;

pub use config::ChatConfig;
pub use error::{ChatError, HandlerError};
pub use intent::{IntentResolver, RuleSet};
pub use types::ChatResponse;
