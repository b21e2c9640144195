use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::{ConfigError, ConfigStore};
use crate::mapping::MappingsConfig;

/// Stores the entry as a JSON document on disk.
///
/// Saves go to a temporary file next to the target which is then renamed over it,
/// so a reader never observes a half written document.
#[derive(Debug, Clone)]
pub struct JsonFileConfigStore {
    path: PathBuf,
}

impl JsonFileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Stores the entry as `<dir>/language_header.mappings.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{}.json", MappingsConfig::NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl ConfigStore for JsonFileConfigStore {
    fn load(&self) -> Result<Option<MappingsConfig>, ConfigError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConfigError::io(&self.path, e)),
        };

        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn save(&self, config: &MappingsConfig) -> Result<(), ConfigError> {
        let json = serde_json::to_vec_pretty(config)?;

        let mut file = NamedTempFile::new_in(self.parent_dir()).map_err(|e| ConfigError::io(&self.path, e))?;
        file.write_all(&json).map_err(|e| ConfigError::io(&self.path, e))?;
        file.persist(&self.path).map_err(|e| ConfigError::io(&self.path, e.error))?;

        debug!(path = %self.path.display(), entries = config.map.len(), "saved header mappings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use indoc::indoc;

    use crate::config::{ConfigError, ConfigStore, JsonFileConfigStore};
    use crate::mapping::{MappingKey, MappingTable, MappingsConfig};

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileConfigStore::in_dir(dir.path());

        assert!(store.path().ends_with("language_header.mappings.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileConfigStore::in_dir(dir.path());

        let mut table = MappingTable::new();
        table.insert(MappingKey::new("X-Zone", "eu").unwrap(), "de");
        table.insert(MappingKey::new("Accept-Region", "ch").unwrap(), "fr");
        table.insert(MappingKey::new("X-Tag", "a:b").unwrap(), "it");
        table.sort_keys();

        let config = MappingsConfig::new(table);
        store.save(&config).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, config);
        let keys = loaded.map.iter().map(|(key, _)| key.composite()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["Accept-Region:ch", "X-Tag:a:b", "X-Zone:eu"]);
    }

    #[test]
    fn test_reads_hand_written_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileConfigStore::in_dir(dir.path());
        fs::write(
            store.path(),
            indoc! {r#"
            {"map": {"X-B:1": "fr", "X-A:1": "de"}}
            "#},
        )
        .unwrap();

        let loaded = store.load().unwrap().unwrap();
        let keys = loaded.map.iter().map(|(key, _)| key.composite()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["X-B:1", "X-A:1"]);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileConfigStore::in_dir(dir.path());
        fs::write(store.path(), "{\"map\": [").unwrap();

        assert!(matches!(store.load(), Err(ConfigError::Serde { .. })));
    }
}
