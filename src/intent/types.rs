use crate::config::BrowserFamily;
use crate::resolver::Command;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// What a routed intent does once its countdown completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteAction {
    Navigate(String),
    Run(Command),
}

/// Result of classifying one natural-language query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePlan {
    /// Rule that produced the plan (`url` and `fallback` for the non-rule paths).
    pub rule: &'static str,
    /// Human label shown in the routing badge.
    pub label: String,
    /// Raw query as typed, echoed in the badge.
    pub query: String,
    pub action: RouteAction,
}

impl RoutePlan {
    pub fn url(&self) -> Option<&str> {
        match &self.action {
            RouteAction::Navigate(url) => Some(url),
            RouteAction::Run(_) => None,
        }
    }

    pub fn command(&self) -> Option<&Command> {
        match &self.action {
            RouteAction::Run(cmd) => Some(cmd),
            RouteAction::Navigate(_) => None,
        }
    }
}

/// The three views of a query the rules look at.
#[derive(Debug, Clone)]
pub struct IntentQuery {
    pub raw: String,
    /// Raw text minus a leading conversational verb.
    pub cleaned: String,
    /// `cleaned`, lowercased. Patterns match against this.
    pub lower: String,
    pub browser: BrowserFamily,
}

/// One ordered heuristic: any pattern hit selects `target`. A target that
/// returns `None` declines and matching continues with the next rule.
pub struct IntentRule {
    pub name: &'static str,
    pub patterns: Vec<Regex>,
    pub target: fn(&IntentQuery) -> Option<RouteAction>,
}

impl IntentRule {
    pub fn matches(&self, lower: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(lower))
    }
}

impl std::fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentRule")
            .field("name", &self.name)
            .field("patterns", &self.patterns.iter().map(Regex::as_str).collect::<Vec<_>>())
            .finish()
    }
}
