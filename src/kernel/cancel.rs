use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

/// Network-backed tools. At most one request per kind is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Spell,
    Prompt,
    IpInfo,
    SpeedTest,
    Weather,
}

/// Handle for one in-flight request. The token is shared with the task.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    pub id: RequestId,
    pub kind: ToolKind,
    pub token: CancellationToken,
}

/// Tracks the live request per tool; starting a new one cancels the old one.
#[derive(Debug, Default)]
pub struct CancellationRegistry {
    live: HashMap<ToolKind, RequestTicket>,
}

impl CancellationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, kind: ToolKind) -> RequestTicket {
        let ticket = RequestTicket {
            id: RequestId::new(),
            kind,
            token: CancellationToken::new(),
        };
        if let Some(previous) = self.live.insert(kind, ticket.clone()) {
            debug!(?kind, id = ?previous.id, "Superseded request cancelled");
            previous.token.cancel();
        }
        ticket
    }

    /// Returns whether a live request was cancelled.
    pub fn cancel(&mut self, kind: ToolKind) -> bool {
        match self.live.remove(&kind) {
            Some(ticket) => {
                ticket.token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, ticket) in self.live.drain() {
            ticket.token.cancel();
        }
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        self.live.values().any(|t| t.id == id)
    }

    pub fn is_live(&self, kind: ToolKind) -> bool {
        self.live.contains_key(&kind)
    }

    /// Retires a completed request. `None` means it was superseded or cancelled
    /// and its result must be dropped.
    pub fn finish(&mut self, id: RequestId) -> Option<ToolKind> {
        let kind = self.live.iter().find(|(_, t)| t.id == id).map(|(k, _)| *k)?;
        self.live.remove(&kind);
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_cancels_previous_ticket_of_same_kind() {
        let mut registry = CancellationRegistry::new();
        let first = registry.begin(ToolKind::Spell);
        let other = registry.begin(ToolKind::Prompt);
        let second = registry.begin(ToolKind::Spell);

        assert!(first.token.is_cancelled());
        assert!(!other.token.is_cancelled());
        assert!(!registry.is_current(first.id));
        assert_eq!(registry.finish(first.id), None);
        assert_eq!(registry.finish(second.id), Some(ToolKind::Spell));
        assert!(!registry.is_live(ToolKind::Spell));
    }
}
