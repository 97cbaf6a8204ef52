#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Tick {
    pub frame: u64,
}

/// Default logical tick length.
pub const TICK_MS: u64 = 50;

impl Tick {
    pub fn new() -> Self {
        Tick { frame: 0 }
    }

    pub fn next(&self) -> Self {
        Tick {
            frame: self.frame + 1,
        }
    }

    /// Logical clock reading for a tick of `tick_ms` milliseconds.
    pub fn as_millis(&self, tick_ms: u64) -> u64 {
        self.frame * tick_ms
    }
}
