//! Intent classification and dispatch
//!
//! - `rules` - ordered (pattern, action) table
//! - `resolver` - normalises a message and walks the table

pub mod resolver;
pub mod rules;

pub use resolver::{validate_message, IntentResolver};
pub use rules::{IntentAction, IntentMatch, IntentRule, RuleSet};
