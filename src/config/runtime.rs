use super::types::BrowserFamily;
use crate::kernel::time::TICK_MS;
use std::path::PathBuf;

pub const DEFAULT_STORE_PATH: &str = "startpage.json";

/// Process-level options for the driver. User settings live in the store, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// `None` keeps settings in memory only.
    pub store_path: Option<PathBuf>,
    pub browser: BrowserFamily,
    /// Length of one reactor tick.
    pub tick_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            store_path: Some(PathBuf::from(DEFAULT_STORE_PATH)),
            browser: BrowserFamily::Unknown,
            tick_ms: TICK_MS,
        }
    }
}

impl RuntimeConfig {
    /// Reads `STARTPAGE_STORE` (`:memory:` for a volatile store),
    /// `STARTPAGE_BROWSER`, `STARTPAGE_USER_AGENT` and `STARTPAGE_TICK_MS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("STARTPAGE_STORE") {
            config.store_path = match path.trim() {
                ":memory:" => None,
                "" => config.store_path,
                p => Some(PathBuf::from(p)),
            };
        }

        config.browser = match (lookup("STARTPAGE_BROWSER"), lookup("STARTPAGE_USER_AGENT")) {
            (Some(family), _) => BrowserFamily::parse(&family),
            (None, Some(ua)) => BrowserFamily::from_user_agent(&ua),
            (None, None) => BrowserFamily::Unknown,
        };

        if let Some(ms) = lookup("STARTPAGE_TICK_MS").and_then(|v| v.trim().parse::<u64>().ok()) {
            if ms > 0 {
                config.tick_ms = ms;
            }
        }

        config
    }
}
