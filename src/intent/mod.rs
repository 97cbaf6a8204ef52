//! Semantic intent router: rule-based classification of natural-language input.

pub mod labels;
pub mod router;
pub mod rules;
pub mod types;

pub use router::{extract_intent_url, strip_intent_lead, IntentRouter};
pub use types::{IntentQuery, IntentRule, RouteAction, RoutePlan};
