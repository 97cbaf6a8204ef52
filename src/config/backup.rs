//! Export/import of the settings store as a versioned JSON document.
//!
//! Only allowlisted keys travel. Import restores whatever allowlisted keys are
//! present and ignores everything else, so older and newer documents both load.

use super::settings::keys;
use super::store::KeyValueStore;
use crate::error::BackupError;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::info;

pub const BACKUP_VERSION: u64 = 1;

pub const BACKUP_KEYS: &[&str] = &[
    keys::USERNAME,
    keys::THEME,
    keys::WEATHER_LOCATION,
    keys::WEATHER_UNIT,
    keys::TIMEZONE,
    keys::GEMINI_API_KEY,
    keys::GEMINI_MODEL,
    keys::GEMINI_SYSTEM_PROMPT,
    keys::AI_MODE_ENABLED,
    keys::AI_ROUTE_BADGE_MODE,
    keys::SEARCH_ENGINE,
    keys::BOOKMARKS,
    keys::SYNTAX_COLORS,
    keys::SEARCH_OVERRIDES,
    keys::CUSTOM_TAGS,
];

pub fn export(store: &dyn KeyValueStore, exported_at: DateTime<Utc>) -> Value {
    let mut doc = Map::new();
    doc.insert("_version".to_string(), Value::from(BACKUP_VERSION));
    doc.insert("_exported".to_string(), Value::from(exported_at.to_rfc3339()));
    for key in BACKUP_KEYS {
        if let Some(value) = store.get(key) {
            doc.insert(key.to_string(), Value::String(value));
        }
    }
    Value::Object(doc)
}

/// `startpage-backup-YYYY-MM-DD.json`
pub fn backup_file_name(exported_at: DateTime<Utc>) -> String {
    format!("startpage-backup-{}.json", exported_at.format("%Y-%m-%d"))
}

/// Restores allowlisted keys from `text`. Returns how many were written.
///
/// The document is fully parsed before anything is written; a malformed file
/// leaves the store untouched.
pub fn import(store: &mut dyn KeyValueStore, text: &str) -> Result<usize, BackupError> {
    let doc: Value =
        serde_json::from_str(text).map_err(|e| BackupError::InvalidDocument(e.to_string()))?;
    let Value::Object(map) = doc else {
        return Err(BackupError::NotAnObject);
    };

    let restore: Vec<(&str, String)> = BACKUP_KEYS
        .iter()
        .filter_map(|key| {
            map.get(*key).and_then(|v| match v {
                Value::Null => None,
                Value::String(s) => Some((*key, s.clone())),
                // Hand-edited backups sometimes inline the JSON; store it encoded.
                other => Some((*key, other.to_string())),
            })
        })
        .collect();

    for (key, value) in &restore {
        store.set(key, value)?;
    }
    info!("Restored {} settings from backup", restore.len());
    Ok(restore.len())
}
