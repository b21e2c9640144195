use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::config::{ConfigError, ConfigStore};
use crate::mapping::MappingsConfig;

/// Keeps the entry in memory, swapping the whole entry atomically on save.
///
/// Readers never block writers: a negotiation running concurrently with a save sees
/// either the previous table or the new one, never a mix.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    current: ArcSwapOption<MappingsConfig>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MappingsConfig) -> Self {
        Self { current: ArcSwapOption::from_pointee(config) }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<Option<MappingsConfig>, ConfigError> {
        Ok(self.current.load_full().map(|config| config.as_ref().clone()))
    }

    fn save(&self, config: &MappingsConfig) -> Result<(), ConfigError> {
        self.current.store(Some(Arc::new(config.clone())));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigStore, MemoryConfigStore};
    use crate::mapping::{MappingKey, MappingTable, MappingsConfig};

    #[test]
    fn test_new_store_is_empty() {
        let store = MemoryConfigStore::new();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_replaces_entry() {
        let mut first = MappingTable::new();
        first.insert(MappingKey::new("X-Language", "de").unwrap(), "de");
        let store = MemoryConfigStore::with_config(MappingsConfig::new(first));

        let mut second = MappingTable::new();
        second.insert(MappingKey::new("X-Region", "ch").unwrap(), "fr");
        store.save(&MappingsConfig::new(second.clone())).unwrap();

        assert_eq!(store.load().unwrap(), Some(MappingsConfig::new(second)));
    }
}
