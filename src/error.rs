use thiserror::Error;

/// Failures of the key-value store itself. Reads never fail; writes can.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Validation failures raised by the settings editors.
/// A save that returns one of these has not written anything.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("bookmarks must be a JSON array")]
    NotAnArray,
    #[error("duplicate tag prefix '{0}'")]
    DuplicateTagPrefix(String),
    #[error(transparent)]
    Store(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("invalid backup file: {0}")]
    InvalidDocument(String),
    #[error("backup document must be a JSON object")]
    NotAnObject,
    #[error(transparent)]
    Store(#[from] ConfigError),
}
