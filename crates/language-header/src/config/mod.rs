//! Storage of the `language_header.mappings` configuration entry.
//!
//! The mapping table is always written as a whole: a save replaces whatever was
//! stored before. Loading an entry that was never saved yields `None`, which callers
//! treat as an empty table.

mod file;
mod memory;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::mapping::MappingsConfig;

pub use file::JsonFileConfigStore;
pub use memory::MemoryConfigStore;

#[cfg_attr(test, mockall::automock)]
pub trait ConfigStore: Send + Sync {
    /// Loads the stored entry, `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<MappingsConfig>, ConfigError>;

    /// Replaces the stored entry.
    fn save(&self, config: &MappingsConfig) -> Result<(), ConfigError>;
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access config file '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid config data: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn io<E: Into<io::Error>>(path: &Path, e: E) -> Self {
        Self::Io { path: path.to_path_buf(), source: e.into() }
    }
}
