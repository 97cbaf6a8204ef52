use crate::resolver::Command;

pub fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Help => "Help",
        Command::Settings => "Settings",
        Command::IpInfo => "Network Info",
        Command::SpeedTest => "Speed Test",
        Command::WeatherSettings => "Weather Settings",
        Command::TimeSettings => "Time Settings",
        Command::Spell(_) => "Spell Check",
        _ => "Tool",
    }
}

/// Known providers by URL fragment, checked in order before falling back to the host.
const URL_LABELS: &[(&str, &str)] = &[
    ("google.com/maps", "Google Maps"),
    ("youtube.com", "YouTube"),
    ("reddit.com", "Reddit"),
    ("imdb.com", "IMDb"),
    ("onelook.com/thesaurus", "OneLook Thesaurus"),
    ("onelook.com/?related=1", "OneLook Synonyms"),
    ("onelook.com/?mentions=1", "OneLook Quotes"),
    ("onelook.com", "OneLook"),
    ("alternativeto.net", "AlternativeTo"),
    ("addons.mozilla.org", "Extension Store"),
    ("chromewebstore.google.com", "Extension Store"),
    ("google.com/search", "Google Search"),
    ("duckduckgo.com/?q=", "DuckDuckGo Search"),
    ("bing.com/search", "Bing Search"),
];

pub fn url_label(target: &str) -> String {
    let lower = target.to_lowercase();
    if let Some((_, label)) = URL_LABELS.iter().find(|(frag, _)| lower.contains(frag)) {
        return label.to_string();
    }

    url::Url::parse(target)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "Website".to_string())
}
