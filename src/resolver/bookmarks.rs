use crate::config::Bookmark;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Prefix searches that leave the bookmark grid unhighlighted.
static SEARCH_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(r|yt|alt|ddg|imdb|def|the|syn|quote|maps|cws|spell|gem|gemini|ai):")
        .expect("search syntax pattern")
});

/// First bookmark whose title starts with the input, else the first whose
/// title contains it. Case-insensitive; empty input never matches.
pub fn find_first_match<'a>(bookmarks: &'a [Bookmark], raw: &str) -> Option<&'a Bookmark> {
    let needle = raw.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let mut contains = None;
    for bookmark in bookmarks {
        let title = bookmark.title.trim().to_lowercase();
        if title.starts_with(&needle) {
            return Some(bookmark);
        }
        if contains.is_none() && title.contains(&needle) {
            contains = Some(bookmark);
        }
    }
    contains
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    Match,
    NoMatch,
    /// The bookmark Enter would open.
    Primary,
}

/// Per-bookmark highlight for the typed value, or `None` when the grid
/// should be reset (empty input or a search prefix).
pub fn highlight(bookmarks: &[Bookmark], raw: &str) -> Option<Vec<Highlight>> {
    let value = raw.to_lowercase();
    if value.is_empty() || SEARCH_SYNTAX.is_match(&value) {
        return None;
    }

    let primary = find_first_match(bookmarks, raw);
    let needle = value.strip_prefix(':').unwrap_or(&value);

    Some(
        bookmarks
            .iter()
            .map(|b| {
                if primary.is_some_and(|p| std::ptr::eq(p, b)) {
                    Highlight::Primary
                } else if b.title.to_lowercase().contains(needle) {
                    Highlight::Match
                } else {
                    Highlight::NoMatch
                }
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Bookmark> {
        vec![
            Bookmark::new("ChatGPT", "https://chatgpt.com/"),
            Bookmark::new("Github", "https://github.com/"),
            Bookmark::new("Gmail", "https://mail.google.com/"),
        ]
    }

    #[test]
    fn prefix_match_beats_earlier_contains_match() {
        let grid = grid();
        assert_eq!(find_first_match(&grid, "g").map(|b| b.title.as_str()), Some("Github"));
        assert_eq!(find_first_match(&grid, "gpt").map(|b| b.title.as_str()), Some("ChatGPT"));
        assert!(find_first_match(&grid, "   ").is_none());
    }

    #[test]
    fn highlight_marks_primary_and_resets_on_prefix() {
        let grid = grid();
        assert_eq!(
            highlight(&grid, "gi"),
            Some(vec![Highlight::NoMatch, Highlight::Primary, Highlight::NoMatch])
        );
        assert_eq!(highlight(&grid, "yt:lofi"), None);
        assert_eq!(highlight(&grid, ""), None);
    }
}
