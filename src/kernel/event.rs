use super::cancel::{RequestId, RequestTicket, ToolKind};
use super::hint::Hint;
use crate::config::Theme;
use crate::resolver::bookmarks::Highlight;
use crate::services::{ToolOutput, ToolRequest};

#[derive(Debug, Clone)]
pub enum Event {
    /// Terminal and panel signals from the front end.
    Input(InputEvent),
    /// A finished tool request, accepted only while its ticket is current.
    ToolResult(ToolReply),
    /// Stops the driver loop.
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct ToolReply {
    pub request: RequestId,
    pub output: ToolOutput,
}

#[derive(Debug, Clone)]
pub struct InputEvent {
    pub source: String,
    pub content: InputContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputContent {
    /// The terminal text changed.
    Typed(String),
    /// Enter.
    Submit(String),
    /// Ctrl/Alt+Enter; `focus` with Shift.
    SubmitNewTab { text: String, focus: bool },
    HistoryPrev,
    HistoryNext,
    /// Tab or ArrowRight on a ghost suggestion.
    AcceptSuggestion,
    /// Escape.
    Cancel,
    /// The spell panel's own input changed.
    SpellEdit(String),
    PanelClosed(Panel),
}

impl InputEvent {
    pub fn new(source: &str, content: InputContent) -> Self {
        Self {
            source: source.to_string(),
            content,
        }
    }

    pub fn typed(source: &str, text: &str) -> Self {
        Self::new(source, InputContent::Typed(text.to_string()))
    }

    pub fn submit(source: &str, text: &str) -> Self {
        Self::new(source, InputContent::Submit(text.to_string()))
    }
}

/// Panels the front end can open. Weather and time settings share `Config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Help,
    Config,
    IpInfo,
    SpeedTest,
    BookmarksEditor,
    Customize,
    Tags,
    Prompt,
    SpellCheck,
}

impl Panel {
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Help => "help",
            Panel::Config => "config",
            Panel::IpInfo => "ip-info",
            Panel::SpeedTest => "speed-test",
            Panel::BookmarksEditor => "bookmarks-editor",
            Panel::Customize => "customize",
            Panel::Tags => "tags",
            Panel::Prompt => "prompt",
            Panel::SpellCheck => "spell-check",
        }
    }

    /// Tool whose request dies with this panel.
    pub fn tool(&self) -> Option<ToolKind> {
        match self {
            Panel::IpInfo => Some(ToolKind::IpInfo),
            Panel::SpeedTest => Some(ToolKind::SpeedTest),
            Panel::Prompt => Some(ToolKind::Prompt),
            Panel::SpellCheck => Some(ToolKind::Spell),
            _ => None,
        }
    }
}

/// Everything the core asks of its collaborators.
#[derive(Debug, Clone)]
pub enum SideEffect {
    ShowLoading,
    Navigate(String),
    OpenInNewTab { url: String, focus: bool },
    OpenPanel(Panel),
    ApplyTheme(Theme),
    Notice(String),
    ClearInput,
    SetInput(String),
    SetHint(Hint),
    ResetHighlight,
    Highlight(Vec<Highlight>),
    ShowBadge { text: String, preview: bool },
    HideBadge,
    StartRequest { ticket: RequestTicket, request: ToolRequest },
    Render(ToolOutput),
}

/// Executes side effects on behalf of the driver loop. Tool requests are
/// spawned by the loop itself and never reach the sink.
pub trait EffectSink {
    fn apply(&mut self, effect: SideEffect);
}

impl EffectSink for Vec<SideEffect> {
    fn apply(&mut self, effect: SideEffect) {
        self.push(effect);
    }
}
