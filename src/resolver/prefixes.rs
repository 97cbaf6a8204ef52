use crate::config::{BrowserFamily, SearchOverrides};

/// Placeholder substituted with the encoded query in templates and custom tags.
pub const QUERY_PLACEHOLDER: &str = "$q";

/// A built-in `token:` search shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPrefix {
    pub token: &'static str,
    pub label: &'static str,
    pub template: &'static str,
    pub overridable: bool,
}

pub const SEARCH_PREFIXES: &[SearchPrefix] = &[
    SearchPrefix { token: "yt", label: "YouTube", template: "https://www.youtube.com/results?search_query=", overridable: true },
    SearchPrefix { token: "r", label: "Reddit", template: "https://google.com/search?q=site%3Areddit.com%20", overridable: true },
    SearchPrefix { token: "ddg", label: "DuckDuckGo", template: "https://duckduckgo.com/?q=", overridable: true },
    SearchPrefix { token: "bing", label: "Bing", template: "https://www.bing.com/search?q=", overridable: true },
    SearchPrefix { token: "ggl", label: "Google", template: "https://www.google.com/search?q=", overridable: true },
    SearchPrefix { token: "amazon", label: "Amazon", template: "https://www.amazon.com/s?k=", overridable: true },
    SearchPrefix { token: "imdb", label: "IMDb", template: "https://www.imdb.com/find?q=", overridable: true },
    SearchPrefix { token: "alt", label: "AlternativeTo", template: "https://alternativeto.net/browse/search/?q=", overridable: true },
    SearchPrefix { token: "maps", label: "Google Maps", template: "https://www.google.com/maps/search/", overridable: true },
    SearchPrefix { token: "def", label: "OneLook", template: "https://onelook.com/?w=", overridable: false },
    SearchPrefix { token: "the", label: "OneLook Thesaurus", template: "https://onelook.com/thesaurus/?s=", overridable: false },
    SearchPrefix { token: "syn", label: "OneLook Synonyms", template: "https://onelook.com/?related=1&w=", overridable: false },
    SearchPrefix { token: "quote", label: "OneLook Quotes", template: "https://onelook.com/?mentions=1&w=", overridable: false },
];

/// Extension store shortcut; its URL depends on the browser family.
pub const EXTENSION_STORE_TOKEN: &str = "cws";

pub const OVERRIDABLE_PREFIXES: &[&str] =
    &["yt", "r", "ddg", "bing", "ggl", "amazon", "imdb", "alt", "maps"];

pub fn find_prefix(token: &str) -> Option<&'static SearchPrefix> {
    SEARCH_PREFIXES.iter().find(|p| p.token.eq_ignore_ascii_case(token))
}

/// Returns the text after `token:` when `raw` starts with it, ignoring ASCII case.
pub fn strip_token<'a>(raw: &'a str, token: &str) -> Option<&'a str> {
    let head = raw.get(..token.len())?;
    if head.eq_ignore_ascii_case(token) && raw[token.len()..].starts_with(':') {
        Some(&raw[token.len() + 1..])
    } else {
        None
    }
}

pub fn encode_query(query: &str) -> String {
    urlencoding::encode(query.trim()).into_owned()
}

/// Substitutes every `$q` in `template`, or appends when there is none.
/// `encoded` must already be percent-encoded.
pub fn fill_template(template: &str, encoded: &str) -> String {
    if template.contains(QUERY_PLACEHOLDER) {
        template.replace(QUERY_PLACEHOLDER, encoded)
    } else {
        format!("{}{}", template, encoded)
    }
}

impl SearchPrefix {
    /// The user's override when one is set for this prefix, else the default.
    pub fn effective_template<'a>(&'a self, overrides: &'a SearchOverrides) -> &'a str {
        if self.overridable {
            if let Some(url) = overrides.get(self.token).filter(|u| !u.trim().is_empty()) {
                return url.trim();
            }
        }
        self.template
    }

    pub fn build(&self, query: &str, overrides: &SearchOverrides) -> String {
        fill_template(self.effective_template(overrides), &encode_query(query))
    }
}

pub fn extension_store_url(query: &str, browser: BrowserFamily) -> String {
    let encoded = encode_query(query);
    match browser {
        BrowserFamily::Firefox => {
            format!("https://addons.mozilla.org/en-US/firefox/search/?q={}", encoded)
        }
        _ => format!("https://chromewebstore.google.com/search/{}", encoded),
    }
}
