use chrono::{TimeZone, Utc};
use startpage::config::backup;
use startpage::config::editors::{self, ConfigForm, TagsForm};
use startpage::config::settings::{default_bookmarks, DEFAULT_GEMINI_MODEL};
use startpage::config::{
    BadgeMode, Bookmark, FileStore, KeyValueStore, MemoryStore, SearchEngine, Settings, Theme,
};
use startpage::error::{BackupError, EditorError};

#[test]
fn test_defaults_on_empty_store() {
    let settings = Settings::in_memory();
    assert_eq!(settings.theme(), Theme::Light);
    assert_eq!(settings.search_engine(), SearchEngine::Google);
    assert_eq!(settings.badge_mode(), BadgeMode::Live);
    assert!(!settings.ai_mode_enabled());
    assert_eq!(settings.gemini_model(), DEFAULT_GEMINI_MODEL);
    assert_eq!(settings.bookmarks(), default_bookmarks());
    assert!(settings.custom_tags().is_empty());
}

#[test]
fn test_malformed_values_fall_back_to_defaults() {
    let store = MemoryStore::with_entries([
        ("bookmarks", "{not json"),
        ("customTags", "42"),
        ("theme", "plaid"),
        ("aiRouteBadgeMode", "sometimes"),
        ("searchEngine", "altavista"),
    ]);
    let settings = Settings::new(store);

    assert_eq!(settings.bookmarks(), default_bookmarks());
    assert!(settings.custom_tags().is_empty());
    assert_eq!(settings.theme(), Theme::Light);
    assert_eq!(settings.badge_mode(), BadgeMode::Live);
    assert_eq!(settings.search_engine(), SearchEngine::Google);
}

#[test]
fn test_partial_syntax_colors_are_layered_over_defaults() {
    let store = MemoryStore::with_entries([("syntaxColors", r##"{"cmd":"#000000"}"##)]);
    let settings = Settings::new(store);
    let colors = settings.syntax_colors();
    assert_eq!(colors["cmd"], "#000000");
    assert_eq!(colors["url"], "#56b6c2");
}

#[test]
fn test_file_store_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("startpage.json");

    {
        let mut settings = Settings::new(FileStore::open(&path).unwrap());
        settings.save_theme(Theme::Coffee).unwrap();
        settings.save_ai_mode_enabled(true).unwrap();
    }

    let reopened = Settings::new(FileStore::open(&path).unwrap());
    assert_eq!(reopened.theme(), Theme::Coffee);
    assert!(reopened.ai_mode_enabled());
}

#[test]
fn test_invalid_bookmarks_json_leaves_store_untouched() {
    let mut settings = Settings::in_memory();
    let saved = vec![Bookmark::new("Docs", "https://docs.rs")];
    settings.save_bookmarks(&saved).unwrap();

    let err = editors::save_bookmarks_json(&mut settings, "[{\"title\": ").unwrap_err();
    assert!(matches!(err, EditorError::InvalidJson(_)));
    let err = editors::save_bookmarks_json(&mut settings, r#"{"title":"x"}"#).unwrap_err();
    assert!(matches!(err, EditorError::NotAnArray));

    assert_eq!(settings.bookmarks(), saved);
}

#[test]
fn test_grid_rows_fill_missing_fields() {
    let rows = editors::collect_grid_rows([("Docs", ""), ("", "https://a.test"), ("  ", " ")]);
    assert_eq!(
        rows,
        vec![
            Bookmark::new("Docs", "#"),
            Bookmark::new("https://a.test", "https://a.test"),
        ]
    );
}

#[test]
fn test_duplicate_tag_prefixes_are_rejected() {
    let mut settings = Settings::in_memory();
    let form = TagsForm {
        overrides: vec![],
        tags: vec![
            ("gh".into(), "https://github.com/search?q=$q".into()),
            ("GH".into(), "https://gitlab.test/?q=$q".into()),
        ],
    };
    let err = editors::save_tags(&mut settings, &form).unwrap_err();
    assert!(matches!(err, EditorError::DuplicateTagPrefix(p) if p == "gh"));
    assert!(settings.custom_tags().is_empty());
}

#[test]
fn test_tags_form_drops_blank_and_unknown_overrides() {
    let mut settings = Settings::in_memory();
    let form = TagsForm {
        overrides: vec![
            ("yt".into(), " https://invidious.test/search?q= ".into()),
            ("r".into(), "   ".into()),
            ("def".into(), "https://ignored.test/".into()),
        ],
        tags: vec![("G-H!".into(), "https://github.com/search?q=$q".into()), ("".into(), "x".into())],
    };
    editors::save_tags(&mut settings, &form).unwrap();

    let overrides = settings.search_overrides();
    assert_eq!(overrides.len(), 1);
    assert_eq!(overrides["yt"], "https://invidious.test/search?q=");

    let tags = settings.custom_tags();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].prefix, "gh");
}

#[test]
fn test_only_valid_hex_colors_are_saved() {
    let mut settings = Settings::in_memory();
    let colors = editors::save_syntax_colors(
        &mut settings,
        &[("cmd".into(), "#ABCDEF".into()), ("url".into(), "blue".into())],
    )
    .unwrap();
    assert_eq!(colors["cmd"], "#abcdef");
    assert_eq!(colors["url"], "#56b6c2");
    assert_eq!(settings.syntax_colors(), colors);
}

#[test]
fn test_config_form_keeps_other_fields_when_bookmarks_invalid() {
    let mut settings = Settings::in_memory();
    let form = ConfigForm {
        bookmarks_json: "nope".into(),
        weather_location: "Oslo".into(),
        weather_unit: "fahrenheit".into(),
        search_engine: "ddg".into(),
        timezone: "UTC+1".into(),
        username: "ferris".into(),
        gemini_api_key: "\"abc\"".into(),
        gemini_model: "".into(),
        gemini_system_prompt: "be brief".into(),
        ai_mode_enabled: true,
        badge_mode: "route".into(),
    };
    let outcome = editors::save_config(&mut settings, &form).unwrap();

    assert!(outcome.bookmarks_rejected);
    assert_eq!(settings.bookmarks(), default_bookmarks());
    assert_eq!(settings.weather_location(), "Oslo");
    assert_eq!(settings.username(), "ferris");
    assert_eq!(settings.timezone(), "UTC+1");
    assert_eq!(settings.weather_unit(), "fahrenheit");
    assert_eq!(settings.search_engine(), SearchEngine::DuckDuckGo);
    assert_eq!(settings.gemini_api_key(), "abc");
    assert_eq!(settings.gemini_model(), DEFAULT_GEMINI_MODEL);
    assert!(settings.ai_mode_enabled());
    assert_eq!(settings.badge_mode(), BadgeMode::Route);
}

#[test]
fn test_backup_export_carries_version_and_allowlisted_keys() {
    let mut store = MemoryStore::with_entries([("theme", "nord"), ("unrelated", "x")]);
    store.set("username", "ferris").unwrap();
    let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();

    let doc = backup::export(&store, at);
    assert_eq!(doc["_version"], 1);
    assert_eq!(doc["_exported"], "2025-03-14T09:26:53+00:00");
    assert_eq!(doc["theme"], "nord");
    assert_eq!(doc["username"], "ferris");
    assert!(doc.get("unrelated").is_none());
    assert_eq!(backup::backup_file_name(at), "startpage-backup-2025-03-14.json");
}

#[test]
fn test_backup_import_tolerates_missing_and_extra_keys() {
    let mut store = MemoryStore::new();
    let text = r#"{"_version": 1, "theme": "dark", "somethingNew": "x", "username": null}"#;
    assert_eq!(backup::import(&mut store, text).unwrap(), 1);
    assert_eq!(store.get("theme").as_deref(), Some("dark"));
    assert_eq!(store.get("somethingNew"), None);
    assert_eq!(store.get("username"), None);
}

#[test]
fn test_backup_import_rejects_non_objects() {
    let mut store = MemoryStore::with_entries([("theme", "nord")]);
    assert!(matches!(backup::import(&mut store, "[1,2]"), Err(BackupError::NotAnObject)));
    assert!(matches!(backup::import(&mut store, "{oops"), Err(BackupError::InvalidDocument(_))));
    assert_eq!(store.get("theme").as_deref(), Some("nord"));
}
