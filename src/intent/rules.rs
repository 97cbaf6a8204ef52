//! Ordered rule tables. First match wins, so list order is the contract.

use super::types::{IntentQuery, IntentRule, RouteAction};
use crate::resolver::prefixes::{encode_query, extension_store_url};
use crate::resolver::Command;
use regex::Regex;
use std::sync::LazyLock;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("intent rule pattern"))
        .collect()
}

fn rule(
    name: &'static str,
    patterns: &[&str],
    target: fn(&IntentQuery) -> Option<RouteAction>,
) -> IntentRule {
    IntentRule {
        name,
        patterns: compile(patterns),
        target,
    }
}

/// Tool rules map to panel commands and are checked before anything else.
static TOOL_RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    vec![
        rule("help", &[r"\b(help|commands?)\b"], |_| Some(RouteAction::Run(Command::Help))),
        rule("config", &[r"\b(config|settings?|preferences?)\b"], |_| {
            Some(RouteAction::Run(Command::Settings))
        }),
        rule(
            "network-info",
            &[r"\b(ip|ipv4|ipv6|asn|isp|vpn|latency)\b", r"\bnetwork info\b"],
            |_| Some(RouteAction::Run(Command::IpInfo)),
        ),
        rule(
            "speed-test",
            &[r"\b(speed\s*test|internet speed|network speed|wifi speed|download speed|upload speed)\b"],
            |_| Some(RouteAction::Run(Command::SpeedTest)),
        ),
        rule("weather", &[r"\b(weather|forecast|temperature)\b"], |_| {
            Some(RouteAction::Run(Command::WeatherSettings))
        }),
        rule("time", &[r"\b(time|timezone|clock)\b"], |_| {
            Some(RouteAction::Run(Command::TimeSettings))
        }),
    ]
});

fn search(base: &str, q: &IntentQuery) -> Option<RouteAction> {
    Some(RouteAction::Navigate(format!("{}{}", base, encode_query(&q.cleaned))))
}

static SPELL_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(spell|spelling|how do you spell)\b").expect("spell words pattern")
});

/// Single candidate word goes to the spell tool; anything longer declines.
fn spell_candidate(q: &IntentQuery) -> Option<RouteAction> {
    let candidate = SPELL_WORDS.replace_all(&q.cleaned, "").trim().to_string();
    if candidate.is_empty() || candidate.chars().any(char::is_whitespace) {
        return None;
    }
    Some(RouteAction::Run(Command::Spell(candidate)))
}

static WEB_RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    vec![
        rule(
            "maps",
            &[r"\b(map|maps|directions?|navigate|route|near me|nearby|where is|distance to)\b"],
            |q| search("https://www.google.com/maps/search/", q),
        ),
        rule("reddit", &[r"\b(reddit|subreddit|r/)\b"], |q| {
            let scoped = format!("site:reddit.com {}", q.cleaned);
            Some(RouteAction::Navigate(format!(
                "https://google.com/search?q={}",
                encode_query(&scoped)
            )))
        }),
        rule(
            "youtube",
            &[r"\b(youtube|yt|video|watch|trailer|playlist|music video)\b"],
            |q| search("https://www.youtube.com/results?search_query=", q),
        ),
        rule(
            "imdb",
            &[r"\b(movie|film|tv show|series|actor|actress|cast|imdb|rating)\b"],
            |q| search("https://www.imdb.com/find?q=", q),
        ),
        rule("define", &[r"\b(define|definition|meaning)\b"], |q| {
            search("https://onelook.com/?w=", q)
        }),
        rule("thesaurus", &[r"\b(thesaurus|another word for)\b"], |q| {
            search("https://onelook.com/thesaurus/?s=", q)
        }),
        rule("synonyms", &[r"\b(synonym|similar word)\b"], |q| {
            search("https://onelook.com/?related=1&w=", q)
        }),
        rule("quotes", &[r"\b(quote|quotation|who said)\b"], |q| {
            search("https://onelook.com/?mentions=1&w=", q)
        }),
        rule("extensions", &[r"\b(extension|addon|add-on|plugin)\b"], |q| {
            Some(RouteAction::Navigate(extension_store_url(&q.cleaned, q.browser)))
        }),
        rule("alternative-to", &[r"\b(alternative to|replace|substitute)\b"], |q| {
            search("https://alternativeto.net/browse/search/?q=", q)
        }),
        rule("spelling", &[r"\b(spell|spelling)\b"], spell_candidate),
    ]
});

pub fn tool_rules() -> &'static [IntentRule] {
    &TOOL_RULES
}

pub fn web_rules() -> &'static [IntentRule] {
    &WEB_RULES
}

/// First rule in `rules` that matches and does not decline.
pub fn first_match(rules: &'static [IntentRule], query: &IntentQuery) -> Option<(&'static str, RouteAction)> {
    rules
        .iter()
        .filter(|r| r.matches(&query.lower))
        .find_map(|r| (r.target)(query).map(|action| (r.name, action)))
}
