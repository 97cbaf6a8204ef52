pub mod backup;
pub mod editors;
pub mod runtime;
pub mod settings;
pub mod store;
pub mod types;

pub use runtime::RuntimeConfig;
pub use settings::Settings;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use types::*;
