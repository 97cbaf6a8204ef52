use super::labels::{command_label, url_label};
use super::rules::{first_match, tool_rules, web_rules};
use super::types::{IntentQuery, RouteAction, RoutePlan};
use crate::config::{BrowserFamily, SearchEngine};
use crate::resolver::default_search_url;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static INTENT_LEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(open|go to|visit|launch|take me to|show me|find|search|look up)\s+")
        .expect("intent lead pattern")
});
static URL_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("scheme pattern"));

/// Removes one leading conversational verb ("open", "take me to", ...).
pub fn strip_intent_lead(text: &str) -> String {
    INTENT_LEAD.replace(text.trim(), "").trim().to_string()
}

/// The text as a URL when it is a bare domain or already has an http(s) scheme.
pub fn extract_intent_url(text: &str) -> Option<String> {
    let text = text.trim();
    let candidate = URL_SCHEME.replace(text, "");
    if candidate.is_empty() || candidate.contains(' ') || !candidate.contains('.') {
        return None;
    }
    if URL_SCHEME.is_match(text) {
        Some(text.to_string())
    } else {
        Some(format!("https://{}", candidate))
    }
}

/// Deterministic classifier from free text to a routed action.
///
/// Order: tool rules, direct URL, web rules, then the default engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentRouter {
    browser: BrowserFamily,
}

impl IntentRouter {
    pub fn new(browser: BrowserFamily) -> Self {
        Self { browser }
    }

    pub fn query(&self, raw: &str) -> IntentQuery {
        let raw = raw.trim().to_string();
        let cleaned = strip_intent_lead(&raw);
        IntentQuery {
            lower: cleaned.to_lowercase(),
            cleaned,
            raw,
            browser: self.browser,
        }
    }

    /// `None` only for blank input.
    pub fn route(&self, raw: &str, engine: SearchEngine) -> Option<RoutePlan> {
        let query = self.query(raw);
        if query.raw.is_empty() {
            return None;
        }

        if let Some((rule, action)) = first_match(tool_rules(), &query) {
            return Some(self.plan(rule, &query, action));
        }

        if let Some(url) = extract_intent_url(&query.cleaned) {
            return Some(self.plan("url", &query, RouteAction::Navigate(url)));
        }

        if let Some((rule, action)) = first_match(web_rules(), &query) {
            return Some(self.plan(rule, &query, action));
        }

        let text = if query.cleaned.is_empty() { &query.raw } else { &query.cleaned };
        debug!(engine = engine.key(), "No intent rule matched, falling back to search");
        Some(RoutePlan {
            rule: "fallback",
            label: engine.label().to_string(),
            query: query.raw.clone(),
            action: RouteAction::Navigate(default_search_url(text, engine)),
        })
    }

    fn plan(&self, rule: &'static str, query: &IntentQuery, action: RouteAction) -> RoutePlan {
        debug!(rule, query = %query.raw, "Intent rule matched");
        let label = match &action {
            RouteAction::Navigate(url) => url_label(url),
            RouteAction::Run(cmd) => command_label(cmd).to_string(),
        };
        RoutePlan {
            rule,
            label,
            query: query.raw.clone(),
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_is_stripped_once() {
        assert_eq!(strip_intent_lead("Take me to open source news"), "open source news");
        assert_eq!(strip_intent_lead("open"), "open");
    }

    #[test]
    fn intent_url_keeps_explicit_scheme() {
        assert_eq!(extract_intent_url("chess.com"), Some("https://chess.com".into()));
        assert_eq!(extract_intent_url("HTTP://a.io/x"), Some("HTTP://a.io/x".into()));
        assert_eq!(extract_intent_url("https://"), None);
        assert_eq!(extract_intent_url("a b.c"), None);
    }
}
