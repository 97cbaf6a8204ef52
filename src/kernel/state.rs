use super::time::Tick;
use crate::config::Theme;

/// Strict state delta. This is the only way terminal state mutates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateDelta {
    Tick(Tick),
    InputChanged(String),
    InputCleared,
    SuggestionChanged(Option<String>),
    Submitted(String),
    HistoryMoved(usize),
    ThemeApplied(Theme),
}

/// Ephemeral terminal state owned by the reactor. Persisted settings live in
/// the configuration store.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub input: String,
    pub suggestion: Option<String>,
    pub theme: Theme,
    history: Vec<String>,
    /// `None` until the first submission, then the history length after each.
    history_index: Option<usize>,
    pub version: u64,
    pub last_tick: Tick,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn history_index(&self) -> Option<usize> {
        self.history_index
    }

    /// Index ArrowUp would move to, if it moves at all.
    pub fn history_prev(&self) -> Option<usize> {
        match self.history_index {
            Some(i) if i > 0 => Some(i - 1),
            _ => None,
        }
    }

    pub fn history_next(&self) -> Option<usize> {
        let last = self.history.len().checked_sub(1)?;
        match self.history_index {
            Some(i) if i < last => Some(i + 1),
            None => Some(0),
            _ => None,
        }
    }

    pub fn reduce(&mut self, delta: StateDelta) {
        self.version += 1;

        match delta {
            StateDelta::Tick(t) => self.last_tick = t,
            StateDelta::InputChanged(text) => self.input = text,
            StateDelta::InputCleared => {
                self.input.clear();
                self.suggestion = None;
            }
            StateDelta::SuggestionChanged(s) => self.suggestion = s,
            StateDelta::Submitted(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    self.history.push(text.to_string());
                }
                self.history_index = Some(self.history.len());
            }
            StateDelta::HistoryMoved(i) => {
                if let Some(entry) = self.history.get(i) {
                    self.input = entry.clone();
                    self.history_index = Some(i);
                }
            }
            StateDelta::ThemeApplied(theme) => self.theme = theme,
        }
    }
}
