use crate::config::Theme;
use serde::{Deserialize, Serialize};

/// The resolved target of one input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Destination {
    Url { target: String },
    Command { command: Command },
    Unhandled,
}

impl Destination {
    pub fn url(target: impl Into<String>) -> Self {
        Destination::Url {
            target: target.into(),
        }
    }

    pub fn command(command: Command) -> Self {
        Destination::Command { command }
    }

    pub fn as_url(&self) -> Option<&str> {
        match self {
            Destination::Url { target } => Some(target),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiModeAction {
    On,
    Off,
    Toggle,
}

impl AiModeAction {
    pub fn apply(&self, current: bool) -> bool {
        match self {
            AiModeAction::On => true,
            AiModeAction::Off => false,
            AiModeAction::Toggle => !current,
        }
    }
}

/// Named commands. Panel commands carry no payload; tool commands carry their text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "arg", rename_all = "snake_case")]
pub enum Command {
    Help,
    AiRouterHelp,
    Version,
    IpInfo,
    SpeedTest,
    BookmarksEditor,
    Customize,
    TagsEditor,
    Settings,
    WeatherSettings,
    TimeSettings,
    AiMode(AiModeAction),
    Theme(Theme),
    Spell(String),
    Prompt(String),
    SemanticRoute(String),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::AiRouterHelp => "help_ai_router",
            Command::Version => "version",
            Command::IpInfo => "ipconfig",
            Command::SpeedTest => "netspeed",
            Command::BookmarksEditor => "bookmarks",
            Command::Customize => "customize",
            Command::TagsEditor => "tags",
            Command::Settings => "config",
            Command::WeatherSettings => "weather",
            Command::TimeSettings => "time",
            Command::AiMode(_) => "aimode",
            Command::Theme(_) => "theme",
            Command::Spell(_) => "spell",
            Command::Prompt(_) => "gemini",
            Command::SemanticRoute(_) => "ai",
        }
    }

    /// Free-text argument of the tool commands.
    pub fn argument(&self) -> Option<&str> {
        match self {
            Command::Spell(text) | Command::Prompt(text) | Command::SemanticRoute(text) => Some(text),
            _ => None,
        }
    }
}
