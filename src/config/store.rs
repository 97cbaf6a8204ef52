use crate::error::ConfigError;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// String-valued key-value persistence, the browser's `localStorage` in spirit.
/// Complex values are JSON-encoded by the caller.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError>;
}

/// Volatile store. Used by tests and as a fallback when no file is configured.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store. The whole map is rewritten as one JSON object on every write.
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            entries: BTreeMap::new(),
        }
    }

    /// Opens and loads `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut store = Self::new(path.as_ref().to_path_buf());
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&mut self) -> Result<(), ConfigError> {
        if !self.path.exists() {
            return Ok(());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            self.entries.clear();
            return Ok(());
        }
        self.entries = serde_json::from_str(&content)?;
        Ok(())
    }

    fn save(&self) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.save() {
            // Keep memory and disk in agreement when the write fails.
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}
