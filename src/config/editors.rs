//! Save paths of the settings panels. Every function validates first and
//! writes second, so a rejected save leaves the stored state as it was.

use super::settings::Settings;
use super::types::{BadgeMode, Bookmark, CustomTag, SearchEngine, SearchOverrides, SyntaxColors};
use crate::error::EditorError;
use crate::resolver::prefixes::OVERRIDABLE_PREFIXES;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex colour pattern"));

/// Parses the bookmarks JSON editor. Must be an array of `{title, href}` objects.
pub fn parse_bookmarks_json(text: &str) -> Result<Vec<Bookmark>, EditorError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| EditorError::InvalidJson(e.to_string()))?;
    if !value.is_array() {
        return Err(EditorError::NotAnArray);
    }
    serde_json::from_value(value).map_err(|e| EditorError::InvalidJson(e.to_string()))
}

/// Collects grid-editor rows. Blank rows are dropped; a lone title or href
/// fills the other field.
pub fn collect_grid_rows<'a, I>(rows: I) -> Vec<Bookmark>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    rows.into_iter()
        .filter_map(|(title, href)| {
            let (title, href) = (title.trim(), href.trim());
            if title.is_empty() && href.is_empty() {
                return None;
            }
            Some(Bookmark {
                title: if title.is_empty() { href } else { title }.to_string(),
                href: if href.is_empty() { "#" } else { href }.to_string(),
            })
        })
        .collect()
}

pub fn save_bookmarks_json(settings: &mut Settings, text: &str) -> Result<usize, EditorError> {
    let bookmarks = parse_bookmarks_json(text)?;
    settings.save_bookmarks(&bookmarks)?;
    Ok(bookmarks.len())
}

/// Tags panel form: per-prefix overrides and the custom tag rows, as typed.
#[derive(Debug, Clone, Default)]
pub struct TagsForm {
    pub overrides: Vec<(String, String)>,
    pub tags: Vec<(String, String)>,
}

/// Normalises tag rows and rejects duplicate prefixes instead of letting
/// list order pick a winner at lookup time.
pub fn normalize_custom_tags(rows: &[(String, String)]) -> Result<Vec<CustomTag>, EditorError> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for (prefix, url) in rows {
        let tag = CustomTag::new(prefix, url);
        if !tag.is_usable() {
            continue;
        }
        if !seen.insert(tag.prefix.clone()) {
            return Err(EditorError::DuplicateTagPrefix(tag.prefix));
        }
        tags.push(tag);
    }
    Ok(tags)
}

pub fn save_tags(settings: &mut Settings, form: &TagsForm) -> Result<(), EditorError> {
    let tags = normalize_custom_tags(&form.tags)?;

    let overrides: SearchOverrides = form
        .overrides
        .iter()
        .filter(|(key, _)| OVERRIDABLE_PREFIXES.contains(&key.as_str()))
        .filter_map(|(key, url)| {
            let url = url.trim();
            (!url.is_empty()).then(|| (key.clone(), url.to_string()))
        })
        .collect();

    settings.save_search_overrides(&overrides)?;
    settings.save_custom_tags(&tags)?;
    Ok(())
}

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value.trim())
}

/// Applies valid `#rrggbb` edits over the stored colours. Returns the saved map.
pub fn save_syntax_colors(
    settings: &mut Settings,
    edits: &[(String, String)],
) -> Result<SyntaxColors, EditorError> {
    let mut colors = settings.syntax_colors();
    for (key, hex) in edits {
        if is_hex_color(hex) {
            colors.insert(key.clone(), hex.trim().to_lowercase());
        }
    }
    settings.save_syntax_colors(&colors)?;
    Ok(colors)
}

/// Main settings panel form.
#[derive(Debug, Clone, Default)]
pub struct ConfigForm {
    pub bookmarks_json: String,
    pub weather_location: String,
    pub weather_unit: String,
    pub search_engine: String,
    pub timezone: String,
    pub username: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_system_prompt: String,
    pub ai_mode_enabled: bool,
    pub badge_mode: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSaveOutcome {
    /// The bookmarks JSON was invalid and the stored list was kept.
    pub bookmarks_rejected: bool,
}

/// Saves the settings panel. An invalid bookmarks block does not block the
/// other fields; it is reported through the outcome and left untouched.
pub fn save_config(settings: &mut Settings, form: &ConfigForm) -> Result<ConfigSaveOutcome, EditorError> {
    let bookmarks = parse_bookmarks_json(&form.bookmarks_json).ok();

    if let Some(bookmarks) = &bookmarks {
        settings.save_bookmarks(bookmarks)?;
    }
    settings.save_weather_location(&form.weather_location)?;
    if !form.weather_unit.trim().is_empty() {
        settings.save_weather_unit(&form.weather_unit)?;
    }
    if !form.search_engine.trim().is_empty() {
        settings.save_search_engine(SearchEngine::from_key(&form.search_engine))?;
    }
    settings.save_timezone(&form.timezone)?;
    if !form.username.trim().is_empty() {
        settings.save_username(&form.username)?;
    }
    settings.save_gemini_api_key(&form.gemini_api_key)?;
    settings.save_gemini_model(&form.gemini_model)?;
    settings.save_gemini_system_prompt(&form.gemini_system_prompt)?;
    settings.save_ai_mode_enabled(form.ai_mode_enabled)?;
    if let Some(mode) = BadgeMode::parse(&form.badge_mode) {
        settings.save_badge_mode(mode)?;
    }

    Ok(ConfigSaveOutcome {
        bookmarks_rejected: bookmarks.is_none(),
    })
}
