use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Visual themes. `Light` is the baseline and carries no CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    Black,
    Nord,
    Newspaper,
    Coffee,
    Root,
    Neon,
}

impl Default for Theme {
    fn default() -> Self {
        Self::Light
    }
}

/// Command aliases resolved before theme lookup.
const THEME_ALIASES: &[(&str, Theme)] = &[
    ("amoled", Theme::Black),
    ("hacker", Theme::Root),
    ("cyberpunk", Theme::Neon),
];

impl Theme {
    const ALL: [Theme; 8] = [
        Theme::Light,
        Theme::Dark,
        Theme::Black,
        Theme::Nord,
        Theme::Newspaper,
        Theme::Coffee,
        Theme::Root,
        Theme::Neon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Black => "black",
            Theme::Nord => "nord",
            Theme::Newspaper => "newspaper",
            Theme::Coffee => "coffee",
            Theme::Root => "root",
            Theme::Neon => "neon",
        }
    }

    /// Exact identifier lookup, no aliases. Used for stored values.
    pub fn parse(name: &str) -> Option<Theme> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Lookup for a typed theme command: alias substitution, then exact match.
    pub fn from_command(name: &str) -> Option<Theme> {
        let name = name.trim().to_lowercase();
        THEME_ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, theme)| *theme)
            .or_else(|| Self::parse(&name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchEngine {
    #[serde(rename = "google")]
    Google,
    #[serde(rename = "ddg")]
    DuckDuckGo,
    #[serde(rename = "bing")]
    Bing,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::Google
    }
}

impl SearchEngine {
    pub fn key(&self) -> &'static str {
        match self {
            SearchEngine::Google => "google",
            SearchEngine::DuckDuckGo => "ddg",
            SearchEngine::Bing => "bing",
        }
    }

    /// Unknown keys fall back to Google, matching the stored-default behaviour.
    pub fn from_key(key: &str) -> SearchEngine {
        match key.trim().to_lowercase().as_str() {
            "ddg" | "duckduckgo" => SearchEngine::DuckDuckGo,
            "bing" => SearchEngine::Bing,
            _ => SearchEngine::Google,
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            SearchEngine::Google => "https://google.com/search?q=",
            SearchEngine::DuckDuckGo => "https://duckduckgo.com/?q=",
            SearchEngine::Bing => "https://www.bing.com/search?q=",
        }
    }

    /// `encoded` must already be percent-encoded.
    pub fn search_url(&self, encoded: &str) -> String {
        format!("{}{}", self.base_url(), encoded)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchEngine::Google => "Google Search",
            SearchEngine::DuckDuckGo => "DuckDuckGo Search",
            SearchEngine::Bing => "Bing Search",
        }
    }
}

/// How the routing badge is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeMode {
    /// Preview while typing and confirm on submit.
    Live,
    /// Confirm on submit only.
    Route,
    /// Never shown. Routing still happens.
    Off,
}

impl Default for BadgeMode {
    fn default() -> Self {
        Self::Live
    }
}

impl BadgeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeMode::Live => "live",
            BadgeMode::Route => "route",
            BadgeMode::Off => "off",
        }
    }

    pub fn parse(value: &str) -> Option<BadgeMode> {
        match value.trim().to_lowercase().as_str() {
            "live" => Some(BadgeMode::Live),
            "route" => Some(BadgeMode::Route),
            "off" => Some(BadgeMode::Off),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AiModeState {
    pub enabled: bool,
    pub badge_mode: BadgeMode,
}

/// User-defined search prefix. `url` may contain `$q` as the query placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomTag {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub url: String,
}

impl CustomTag {
    pub fn new(prefix: &str, url: &str) -> Self {
        Self {
            prefix: Self::normalize_prefix(prefix),
            url: url.trim().to_string(),
        }
    }

    /// Lowercase ASCII alphanumerics only.
    pub fn normalize_prefix(prefix: &str) -> String {
        prefix
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect()
    }

    pub fn is_usable(&self) -> bool {
        !self.prefix.is_empty() && !self.url.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub href: String,
}

impl Bookmark {
    pub fn new(title: &str, href: &str) -> Self {
        Self {
            title: title.to_string(),
            href: href.to_string(),
        }
    }
}

/// Per-prefix URL overrides keyed by prefix token (`yt`, `r`, ...).
pub type SearchOverrides = BTreeMap<String, String>;

/// Syntax colour classes keyed by `cmd`, `theme`, `search`, `version`, `url`, `unknown`.
pub type SyntaxColors = BTreeMap<String, String>;

/// Coarse browser family, only used to pick an extension store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrowserFamily {
    Chrome,
    Firefox,
    Safari,
    Unknown,
}

impl Default for BrowserFamily {
    fn default() -> Self {
        Self::Unknown
    }
}

impl BrowserFamily {
    /// Chrome's UA also mentions Safari, so order matters here.
    pub fn from_user_agent(ua: &str) -> BrowserFamily {
        if ua.contains("Chrome") {
            BrowserFamily::Chrome
        } else if ua.contains("Firefox") {
            BrowserFamily::Firefox
        } else if ua.contains("Safari") {
            BrowserFamily::Safari
        } else {
            BrowserFamily::Unknown
        }
    }

    pub fn parse(value: &str) -> BrowserFamily {
        match value.trim().to_lowercase().as_str() {
            "chrome" | "chromium" => BrowserFamily::Chrome,
            "firefox" => BrowserFamily::Firefox,
            "safari" => BrowserFamily::Safari,
            _ => BrowserFamily::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserFamily::Chrome => "chrome",
            BrowserFamily::Firefox => "firefox",
            BrowserFamily::Safari => "safari",
            BrowserFamily::Unknown => "unknown",
        }
    }
}

/// Read-only view of the configuration the resolver needs.
/// Taken once per routing attempt so resolution stays pure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSnapshot {
    pub engine: SearchEngine,
    pub custom_tags: Vec<CustomTag>,
    pub overrides: SearchOverrides,
    pub browser: BrowserFamily,
    pub ai: AiModeState,
}
