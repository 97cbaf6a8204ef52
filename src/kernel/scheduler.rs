//! Logical timers for the routing badge and the spell-check debounce.
//!
//! Time is a millisecond reading of the reactor's logical clock. Nothing here
//! sleeps; callers `poll` with the current reading and act on what fires.

use crate::config::BadgeMode;
use crate::intent::RouteAction;

/// Delay between showing a committed route and performing it.
pub const NAV_DELAY_MS: u64 = 550;
/// How long a committed badge stays up.
pub const BADGE_HIDE_MS: u64 = 2600;
/// Quiet period before a spell check request is sent.
pub const SPELL_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgePhase {
    Hidden,
    /// Live preview while typing. No timers.
    Previewing,
    /// Route shown, commit pending.
    Routing,
    /// Commit fired, badge waiting for auto-hide.
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeOutput {
    Show { text: String, preview: bool },
    Hide,
    Commit(RouteAction),
}

pub fn badge_text(label: &str, query: &str) -> String {
    if query.is_empty() {
        format!("Routing to: {}", label)
    } else {
        format!("Routing to: {}\n{}", label, query)
    }
}

#[derive(Debug)]
pub struct BadgeScheduler {
    mode: BadgeMode,
    phase: BadgePhase,
    hide_at: Option<u64>,
    commit: Option<(u64, RouteAction)>,
}

impl BadgeScheduler {
    pub fn new(mode: BadgeMode) -> Self {
        Self {
            mode,
            phase: BadgePhase::Hidden,
            hide_at: None,
            commit: None,
        }
    }

    pub fn mode(&self) -> BadgeMode {
        self.mode
    }

    pub fn phase(&self) -> BadgePhase {
        self.phase
    }

    /// Turning display off hides a visible badge but keeps a pending commit.
    pub fn set_mode(&mut self, mode: BadgeMode) -> Option<BadgeOutput> {
        self.mode = mode;
        match (mode, self.phase) {
            (BadgeMode::Off, BadgePhase::Hidden) => None,
            (BadgeMode::Off, _) | (BadgeMode::Route, BadgePhase::Previewing) => {
                self.hide_at = None;
                self.phase = if self.commit.is_some() { BadgePhase::Routing } else { BadgePhase::Hidden };
                Some(BadgeOutput::Hide)
            }
            _ => None,
        }
    }

    pub fn hide_timer_count(&self) -> usize {
        usize::from(self.hide_at.is_some())
    }

    pub fn has_pending_commit(&self) -> bool {
        self.commit.is_some()
    }

    /// Preview badge for typed text. Only shown in live mode; otherwise hides.
    /// A preview supersedes any pending commit.
    pub fn preview(&mut self, label: &str, query: &str) -> Vec<BadgeOutput> {
        if self.mode != BadgeMode::Live {
            return self.hide().into_iter().collect();
        }
        self.commit = None;
        self.hide_at = None;
        self.phase = BadgePhase::Previewing;
        vec![BadgeOutput::Show {
            text: badge_text(label, query),
            preview: true,
        }]
    }

    /// Shows a committed route and arms the commit and auto-hide timers,
    /// replacing any earlier ones. With the badge off the action fires at once.
    pub fn route(&mut self, label: &str, query: &str, action: RouteAction, now_ms: u64) -> Vec<BadgeOutput> {
        if self.mode == BadgeMode::Off {
            self.commit = None;
            self.hide_at = None;
            self.phase = BadgePhase::Hidden;
            return vec![BadgeOutput::Commit(action)];
        }

        self.hide_at = Some(now_ms + BADGE_HIDE_MS);
        self.commit = Some((now_ms + NAV_DELAY_MS, action));
        self.phase = BadgePhase::Routing;
        vec![BadgeOutput::Show {
            text: badge_text(label, query),
            preview: false,
        }]
    }

    /// Drops timers and any pending commit. `None` when already hidden.
    pub fn hide(&mut self) -> Option<BadgeOutput> {
        self.hide_at = None;
        self.commit = None;
        if self.phase == BadgePhase::Hidden {
            return None;
        }
        self.phase = BadgePhase::Hidden;
        Some(BadgeOutput::Hide)
    }

    pub fn poll(&mut self, now_ms: u64) -> Vec<BadgeOutput> {
        let mut out = Vec::new();

        if self.commit.as_ref().is_some_and(|(due, _)| now_ms >= *due) {
            if let Some((_, action)) = self.commit.take() {
                self.phase = if self.hide_at.is_some() { BadgePhase::Confirmed } else { BadgePhase::Hidden };
                out.push(BadgeOutput::Commit(action));
            }
        }

        if self.hide_at.is_some_and(|due| now_ms >= due) {
            self.hide_at = None;
            if self.commit.is_none() {
                self.phase = BadgePhase::Hidden;
            }
            out.push(BadgeOutput::Hide);
        }

        out
    }
}

/// Single-slot debounce: scheduling again replaces the pending payload.
#[derive(Debug)]
pub struct Debounce<T> {
    pending: Option<(u64, T)>,
}

impl<T> Default for Debounce<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Debounce<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, payload: T, now_ms: u64, delay_ms: u64) {
        self.pending = Some((now_ms + delay_ms, payload));
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        match &self.pending {
            Some((due, _)) if now_ms >= *due => self.pending.take().map(|(_, p)| p),
            _ => None,
        }
    }
}
