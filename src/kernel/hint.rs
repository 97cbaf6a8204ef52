use crate::config::SyntaxColors;
use crate::resolver::looks_like_domain;
use regex::Regex;
use std::sync::LazyLock;

/// Ghost-text completions, checked in order. The first entry that extends the
/// typed value wins.
const SUGGESTIONS: &[&str] = &[
    "r:", "yt:", "alt:", "def:", "ddg:", "imdb:", "the:", "syn:", "quote:", "maps:", "cws:",
    "gem:", "gemini:", "ai:", "spell:", ":config", ":dark", ":black", ":amoled", ":bookmarks",
    ":ipconfig", ":light", ":help", ":help_ai_router", ":aimode", ":gemini", ":netspeed",
    ":weather", ":time", ":version", ":nord", ":newspaper", ":coffee", ":root", ":neon",
];

const THEME_COMMANDS: &[&str] = &[
    ":dark", ":black", ":amoled", ":light", ":nord", ":newspaper", ":coffee", ":root", ":neon",
];
const KNOWN_COMMANDS: &[&str] = &[
    ":help", ":help_ai_router", ":aimode", ":bookmarks", ":bm", ":customize", ":custom", ":tags",
    ":ipconfig", ":ip", ":netspeed", ":speed", ":config", ":weather", ":time", ":gemini",
    ":hacker", ":cyberpunk",
];
const VERSION_COMMANDS: &[&str] = &[":version", ":ver"];

static KNOWN_SEARCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(r|yt|alt|def|ddg|bing|ggl|amazon|imdb|the|syn|quote|maps|cws|spell|gem|gemini|ai):")
        .expect("known search pattern")
});

/// Colour class of the terminal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxClass {
    Plain,
    Command,
    Theme,
    Version,
    Search,
    Url,
    Unknown,
}

impl SyntaxClass {
    /// Key into the syntax colour map.
    pub fn color_key(&self) -> Option<&'static str> {
        match self {
            SyntaxClass::Plain => None,
            SyntaxClass::Command => Some("cmd"),
            SyntaxClass::Theme => Some("theme"),
            SyntaxClass::Version => Some("version"),
            SyntaxClass::Search => Some("search"),
            SyntaxClass::Url => Some("url"),
            SyntaxClass::Unknown => Some("unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    /// Full completion, when one extends the input.
    pub suggestion: Option<String>,
    pub class: SyntaxClass,
    /// `token:` of a search with text after it, shown coloured ahead of the input.
    pub search_prefix: Option<String>,
    pub color: Option<String>,
}

impl Hint {
    pub fn empty() -> Self {
        Self {
            suggestion: None,
            class: SyntaxClass::Plain,
            search_prefix: None,
            color: None,
        }
    }
}

fn any_extends(list: &[&str], value: &str) -> bool {
    list.iter().any(|c| c.starts_with(value))
}

fn command_class(value: &str) -> SyntaxClass {
    if any_extends(VERSION_COMMANDS, value) {
        SyntaxClass::Version
    } else if any_extends(THEME_COMMANDS, value) {
        SyntaxClass::Theme
    } else if any_extends(KNOWN_COMMANDS, value) {
        SyntaxClass::Command
    } else if value.len() > 1 {
        SyntaxClass::Unknown
    } else {
        SyntaxClass::Command
    }
}

/// Suggestion and colour class for the current terminal text.
pub fn hint_for(raw: &str, colors: &SyntaxColors) -> Hint {
    let value = raw.to_lowercase();
    let mut hint = Hint::empty();
    if value.is_empty() {
        return hint;
    }

    if let Some(full) = SUGGESTIONS.iter().find(|s| s.starts_with(value.as_str()) && **s != value) {
        hint.suggestion = Some(full.to_string());
        hint.class = if value.starts_with(':') {
            command_class(&value)
        } else if KNOWN_SEARCH.is_match(&value) {
            SyntaxClass::Search
        } else {
            SyntaxClass::Plain
        };
    } else if value.starts_with(':') {
        hint.class = command_class(&value);
    } else if let Some(m) = KNOWN_SEARCH.find(&value) {
        if m.end() < value.len() {
            hint.search_prefix = Some(value[..m.end()].to_string());
            hint.class = SyntaxClass::Plain;
        } else {
            hint.class = SyntaxClass::Search;
        }
    } else if looks_like_domain(&value) {
        hint.class = SyntaxClass::Url;
    }

    let key = if hint.search_prefix.is_some() { Some("search") } else { hint.class.color_key() };
    hint.color = key.and_then(|k| colors.get(k).cloned());
    hint
}
