use super::store::{KeyValueStore, MemoryStore};
use super::types::{
    AiModeState, BadgeMode, Bookmark, BrowserFamily, ConfigSnapshot, CustomTag, SearchEngine,
    SearchOverrides, SyntaxColors, Theme,
};
use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

pub mod keys {
    pub const USERNAME: &str = "username";
    pub const THEME: &str = "theme";
    pub const WEATHER_LOCATION: &str = "weatherLocation";
    pub const WEATHER_UNIT: &str = "weatherUnit";
    pub const TIMEZONE: &str = "timezone";
    pub const GEMINI_API_KEY: &str = "geminiApiKey";
    pub const GEMINI_MODEL: &str = "geminiModel";
    pub const GEMINI_SYSTEM_PROMPT: &str = "geminiSystemPrompt";
    pub const AI_MODE_ENABLED: &str = "aiModeEnabled";
    pub const AI_ROUTE_BADGE_MODE: &str = "aiRouteBadgeMode";
    pub const SEARCH_ENGINE: &str = "searchEngine";
    pub const BOOKMARKS: &str = "bookmarks";
    pub const SYNTAX_COLORS: &str = "syntaxColors";
    pub const SEARCH_OVERRIDES: &str = "searchOverrides";
    pub const CUSTOM_TAGS: &str = "customTags";
}

pub const DEFAULT_USERNAME: &str = "coffeenerd";
pub const DEFAULT_WEATHER_LOCATION: &str = "Gurgaon";
pub const DEFAULT_TIMEZONE: &str = "UTC+5:30";
pub const DEFAULT_WEATHER_UNIT: &str = "celsius";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";

const DEFAULT_BOOKMARKS: &[(&str, &str)] = &[
    ("Gmail", "https://mail.google.com/"),
    ("HuggingFace", "https://huggingface.co/spaces"),
    ("YouTube", "https://youtube.com"),
    ("Drive", "https://drive.google.com/"),
    ("Discord", "https://discord.com/app"),
    ("Deepsite", "https://deepsite.hf.co/"),
    ("WhatsApp", "https://web.whatsapp.com/"),
    ("Reddit", "https://www.reddit.com/"),
    ("X", "https://x.com/home"),
    ("Pinterest", "https://pinterest.com/"),
    ("DeepSeek", "https://chat.deepseek.com/"),
    ("Grock", "https://grok.com/"),
    ("Perplexity", "https://www.perplexity.ai/"),
    ("ChatGPT", "https://chatgpt.com/"),
    ("AlternativeTo", "https://alternativeto.net/"),
    ("Github", "https://github.com/"),
    ("Gemini", "https://gemini.google.com/app"),
    ("Instagram", "https://www.instagram.com/"),
    ("FMHY", "https://fmhy.net/"),
    ("Claude", "https://claude.ai/new"),
];

const DEFAULT_SYNTAX_COLORS: &[(&str, &str)] = &[
    ("cmd", "#c678dd"),
    ("theme", "#e5c07b"),
    ("search", "#61afef"),
    ("version", "#98c379"),
    ("url", "#56b6c2"),
    ("unknown", "#e06c75"),
];

pub fn default_bookmarks() -> Vec<Bookmark> {
    DEFAULT_BOOKMARKS
        .iter()
        .map(|(title, href)| Bookmark::new(title, href))
        .collect()
}

pub fn default_syntax_colors() -> SyntaxColors {
    DEFAULT_SYNTAX_COLORS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Strips whitespace and one pair of surrounding quotes from a pasted API key.
pub fn normalize_api_key(key: &str) -> String {
    let trimmed = key.trim();
    let quoted = (trimmed.starts_with('"') && trimmed.ends_with('"'))
        || (trimmed.starts_with('\'') && trimmed.ends_with('\''));
    if quoted && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Typed accessors over a [`KeyValueStore`].
///
/// Reads never fail: a missing key or a value that does not parse yields the
/// built-in default (malformed JSON is logged). Writes surface store errors.
pub struct Settings {
    store: Box<dyn KeyValueStore>,
}

impl Settings {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Stored '{}' is malformed, using default: {}", key, e);
                None
            }
        }
    }

    fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), ConfigError> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)
    }

    fn get_or(&self, key: &str, default: &str) -> String {
        match self.store.get(key) {
            Some(v) if !v.is_empty() => v,
            _ => default.to_string(),
        }
    }

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.get_json(keys::BOOKMARKS).unwrap_or_else(default_bookmarks)
    }

    pub fn save_bookmarks(&mut self, bookmarks: &[Bookmark]) -> Result<(), ConfigError> {
        self.set_json(keys::BOOKMARKS, bookmarks)
    }

    pub fn username(&self) -> String {
        self.get_or(keys::USERNAME, DEFAULT_USERNAME)
    }

    pub fn save_username(&mut self, name: &str) -> Result<(), ConfigError> {
        self.store.set(keys::USERNAME, name.trim())
    }

    pub fn theme(&self) -> Theme {
        self.store
            .get(keys::THEME)
            .and_then(|t| Theme::parse(&t))
            .unwrap_or_default()
    }

    pub fn save_theme(&mut self, theme: Theme) -> Result<(), ConfigError> {
        self.store.set(keys::THEME, theme.as_str())
    }

    pub fn search_engine(&self) -> SearchEngine {
        self.store
            .get(keys::SEARCH_ENGINE)
            .map(|k| SearchEngine::from_key(&k))
            .unwrap_or_default()
    }

    pub fn save_search_engine(&mut self, engine: SearchEngine) -> Result<(), ConfigError> {
        self.store.set(keys::SEARCH_ENGINE, engine.key())
    }

    pub fn weather_location(&self) -> String {
        self.get_or(keys::WEATHER_LOCATION, DEFAULT_WEATHER_LOCATION)
    }

    pub fn save_weather_location(&mut self, location: &str) -> Result<(), ConfigError> {
        let location = location.trim();
        let location = if location.is_empty() { DEFAULT_WEATHER_LOCATION } else { location };
        self.store.set(keys::WEATHER_LOCATION, location)
    }

    pub fn weather_unit(&self) -> String {
        self.get_or(keys::WEATHER_UNIT, DEFAULT_WEATHER_UNIT)
    }

    pub fn save_weather_unit(&mut self, unit: &str) -> Result<(), ConfigError> {
        self.store.set(keys::WEATHER_UNIT, unit.trim())
    }

    pub fn timezone(&self) -> String {
        self.get_or(keys::TIMEZONE, DEFAULT_TIMEZONE)
    }

    pub fn save_timezone(&mut self, tz: &str) -> Result<(), ConfigError> {
        let tz = tz.trim();
        self.store.set(keys::TIMEZONE, if tz.is_empty() { DEFAULT_TIMEZONE } else { tz })
    }

    pub fn gemini_api_key(&self) -> String {
        normalize_api_key(&self.store.get(keys::GEMINI_API_KEY).unwrap_or_default())
    }

    pub fn save_gemini_api_key(&mut self, key: &str) -> Result<(), ConfigError> {
        self.store.set(keys::GEMINI_API_KEY, &normalize_api_key(key))
    }

    pub fn gemini_model(&self) -> String {
        self.get_or(keys::GEMINI_MODEL, DEFAULT_GEMINI_MODEL)
    }

    pub fn save_gemini_model(&mut self, model: &str) -> Result<(), ConfigError> {
        let model = model.trim();
        self.store.set(
            keys::GEMINI_MODEL,
            if model.is_empty() { DEFAULT_GEMINI_MODEL } else { model },
        )
    }

    pub fn gemini_system_prompt(&self) -> String {
        self.store.get(keys::GEMINI_SYSTEM_PROMPT).unwrap_or_default()
    }

    pub fn save_gemini_system_prompt(&mut self, prompt: &str) -> Result<(), ConfigError> {
        self.store.set(keys::GEMINI_SYSTEM_PROMPT, prompt.trim())
    }

    pub fn ai_mode_enabled(&self) -> bool {
        self.store
            .get(keys::AI_MODE_ENABLED)
            .map(|v| v.trim() == "true")
            .unwrap_or(false)
    }

    pub fn save_ai_mode_enabled(&mut self, enabled: bool) -> Result<(), ConfigError> {
        self.store
            .set(keys::AI_MODE_ENABLED, if enabled { "true" } else { "false" })
    }

    pub fn badge_mode(&self) -> BadgeMode {
        self.store
            .get(keys::AI_ROUTE_BADGE_MODE)
            .and_then(|m| BadgeMode::parse(&m))
            .unwrap_or_default()
    }

    pub fn save_badge_mode(&mut self, mode: BadgeMode) -> Result<(), ConfigError> {
        self.store.set(keys::AI_ROUTE_BADGE_MODE, mode.as_str())
    }

    pub fn ai_mode(&self) -> AiModeState {
        AiModeState {
            enabled: self.ai_mode_enabled(),
            badge_mode: self.badge_mode(),
        }
    }

    pub fn search_overrides(&self) -> SearchOverrides {
        self.get_json(keys::SEARCH_OVERRIDES).unwrap_or_default()
    }

    pub fn save_search_overrides(&mut self, overrides: &SearchOverrides) -> Result<(), ConfigError> {
        self.set_json(keys::SEARCH_OVERRIDES, overrides)
    }

    pub fn custom_tags(&self) -> Vec<CustomTag> {
        self.get_json(keys::CUSTOM_TAGS).unwrap_or_default()
    }

    pub fn save_custom_tags(&mut self, tags: &[CustomTag]) -> Result<(), ConfigError> {
        self.set_json(keys::CUSTOM_TAGS, tags)
    }

    /// Stored colours layered over the defaults, so a partial map still covers every class.
    pub fn syntax_colors(&self) -> SyntaxColors {
        let mut colors = default_syntax_colors();
        if let Some(stored) = self.get_json::<SyntaxColors>(keys::SYNTAX_COLORS) {
            colors.extend(stored);
        }
        colors
    }

    pub fn save_syntax_colors(&mut self, colors: &SyntaxColors) -> Result<(), ConfigError> {
        self.set_json(keys::SYNTAX_COLORS, colors)
    }

    pub fn snapshot(&self, browser: BrowserFamily) -> ConfigSnapshot {
        ConfigSnapshot {
            engine: self.search_engine(),
            custom_tags: self.custom_tags(),
            overrides: self.search_overrides(),
            browser,
            ai: self.ai_mode(),
        }
    }
}
