//! Syntax-based routing: one line of input to exactly one [`Destination`].
//!
//! Everything here is pure. Configuration comes in as a [`ConfigSnapshot`]
//! taken by the caller, so the same input and snapshot always resolve to the
//! same destination.

pub mod bookmarks;
pub mod destination;
pub mod prefixes;

pub use destination::{AiModeAction, Command, Destination};

use crate::config::{Bookmark, ConfigSnapshot, SearchEngine, Theme};
use prefixes::{
    encode_query, extension_store_url, fill_template, find_prefix, strip_token,
    EXTENSION_STORE_TOKEN, SEARCH_PREFIXES,
};
use regex::Regex;
use std::sync::LazyLock;

/// Where `:gemini` goes.
pub const ASSISTANT_URL: &str = "https://gemini.google.com/app";

static AIMODE_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^:aimode(?:\s+(on|off|toggle))?$").expect("aimode pattern")
});
static SPELL_TOOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^spell\s*:").expect("spell pattern"));
static PROMPT_TOOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:gem|gemini)\s*:").expect("prompt pattern"));
static SEMANTIC_TOOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^ai\s*:").expect("ai pattern"));

pub fn resolve(raw: &str, config: &ConfigSnapshot) -> Destination {
    let raw = raw.trim();
    if raw.is_empty() {
        return Destination::Unhandled;
    }

    if let Some(dest) = resolve_colon_command(raw) {
        return dest;
    }
    // Theme words work with or without the colon.
    if let Some(theme) = Theme::from_command(raw) {
        return Destination::command(Command::Theme(theme));
    }
    if let Some(dest) = resolve_tool(raw) {
        return dest;
    }
    if let Some(url) = resolve_prefixed_search(raw, config) {
        return Destination::url(url);
    }
    if looks_like_domain(raw) {
        return Destination::url(domain_url(raw));
    }
    Destination::url(default_search_url(raw, config.engine))
}

fn resolve_colon_command(raw: &str) -> Option<Destination> {
    let lower = raw.to_lowercase();
    let name = lower.strip_prefix(':')?;

    let command = match name {
        "help" => Command::Help,
        "help_ai_router" => Command::AiRouterHelp,
        "version" | "ver" => Command::Version,
        "ipconfig" | "ip" => Command::IpInfo,
        "netspeed" | "speed" => Command::SpeedTest,
        "gemini" => return Some(Destination::url(ASSISTANT_URL)),
        "bookmarks" | "bm" => Command::BookmarksEditor,
        "customize" | "custom" => Command::Customize,
        "tags" => Command::TagsEditor,
        "config" => Command::Settings,
        "weather" => Command::WeatherSettings,
        "time" => Command::TimeSettings,
        _ => {
            if let Some(caps) = AIMODE_COMMAND.captures(raw) {
                let action = match caps.get(1).map(|m| m.as_str().to_lowercase()).as_deref() {
                    Some("on") => AiModeAction::On,
                    Some("off") => AiModeAction::Off,
                    _ => AiModeAction::Toggle,
                };
                Command::AiMode(action)
            } else {
                Command::Theme(Theme::from_command(name)?)
            }
        }
    };
    Some(Destination::command(command))
}

fn resolve_tool(raw: &str) -> Option<Destination> {
    let tail = |pattern: &Regex| pattern.find(raw).map(|m| raw[m.end()..].trim().to_string());

    let command = if let Some(text) = tail(&SPELL_TOOL) {
        Command::Spell(text)
    } else if let Some(text) = tail(&PROMPT_TOOL) {
        Command::Prompt(text)
    } else if let Some(text) = tail(&SEMANTIC_TOOL) {
        Command::SemanticRoute(text)
    } else {
        return None;
    };

    if command.argument().is_some_and(str::is_empty) {
        return Some(Destination::Unhandled);
    }
    Some(Destination::command(command))
}

/// Text after an `ai:` prefix, trimmed.
pub fn semantic_query(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    SEMANTIC_TOOL.find(raw).map(|m| raw[m.end()..].trim())
}

/// Custom tags in stored order, then the built-in prefixes.
fn resolve_prefixed_search(raw: &str, config: &ConfigSnapshot) -> Option<String> {
    for tag in &config.custom_tags {
        if !tag.is_usable() {
            continue;
        }
        if let Some(rest) = strip_token(raw, tag.prefix.trim()) {
            return Some(fill_template(&tag.url, &encode_query(rest)));
        }
    }

    for prefix in SEARCH_PREFIXES {
        if let Some(rest) = strip_token(raw, prefix.token) {
            return Some(prefix.build(rest, &config.overrides));
        }
    }

    strip_token(raw, EXTENSION_STORE_TOKEN).map(|rest| extension_store_url(rest, config.browser))
}

/// Text that must go through the resolver rather than bookmarks or the
/// semantic router: `:` commands, tool prefixes, and every search prefix.
pub fn has_explicit_syntax(raw: &str, config: &ConfigSnapshot) -> bool {
    let raw = raw.trim();
    if raw.starts_with(':') {
        return true;
    }
    if SPELL_TOOL.is_match(raw) || PROMPT_TOOL.is_match(raw) || SEMANTIC_TOOL.is_match(raw) {
        return true;
    }
    let token = match raw.split_once(':') {
        Some((token, _)) => token,
        None => return false,
    };
    find_prefix(token).is_some()
        || token.eq_ignore_ascii_case(EXTENSION_STORE_TOKEN)
        || config
            .custom_tags
            .iter()
            .any(|t| t.is_usable() && t.prefix.trim().eq_ignore_ascii_case(token))
}

/// A dot and no whitespace.
pub fn looks_like_domain(raw: &str) -> bool {
    raw.contains('.') && !raw.chars().any(char::is_whitespace)
}

pub fn domain_url(raw: &str) -> String {
    if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    }
}

pub fn default_search_url(text: &str, engine: SearchEngine) -> String {
    engine.search_url(&encode_query(text))
}

/// URL the input would open in a new tab, or `None` for inputs that are not
/// navigations (panel commands, tool prefixes, empty input).
pub fn resolve_url(raw: &str, bookmarks: &[Bookmark], config: &ConfigSnapshot) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with(':') {
        return raw.eq_ignore_ascii_case(":gemini").then(|| ASSISTANT_URL.to_string());
    }
    if let Some(bookmark) = bookmarks::find_first_match(bookmarks, raw) {
        return Some(bookmark.href.clone());
    }
    match resolve(raw, config) {
        Destination::Url { target } => Some(target),
        // A bare theme word is still a search when opened in a tab.
        Destination::Command { command: Command::Theme(_) } => Some(default_search_url(raw, config.engine)),
        _ => None,
    }
}
