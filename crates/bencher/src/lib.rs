use std::sync::Arc;

use language_header::config::MemoryConfigStore;
use language_header::mapping::{MappingKey, MappingTable, MappingsConfig};
use language_header::registry::ConfigurableLanguageRegistry;
use language_header::HttpHeaderNegotiation;

/// A negotiation scenario: a table of `entries` mappings and whether the request hits one.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    entries: usize,
    hit: bool,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, entries: usize, hit: bool) -> Self {
        Self { name, group, entries, hit }
    }

    pub fn small(name: &'static str, hit: bool) -> Self {
        Self::new(name, TestGroup::Small, 1, hit)
    }

    pub fn normal(name: &'static str, hit: bool) -> Self {
        Self::new(name, TestGroup::Normal, 16, hit)
    }

    pub fn large(name: &'static str, hit: bool) -> Self {
        Self::new(name, TestGroup::Large, 256, hit)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn hit(&self) -> bool {
        self.hit
    }

    /// Builds a sorted table whose last entry is `X-Bench-<entries - 1>: v`.
    pub fn table(&self) -> MappingTable {
        let mut table = (0..self.entries)
            .filter_map(|i| MappingKey::new(format!("X-Bench-{i:04}"), "v").ok().map(|key| (key, "de".to_owned())))
            .collect::<MappingTable>();
        table.sort_keys();
        table
    }

    /// The request header matching the last table entry, or a header matching none.
    pub fn header(&self) -> (String, &'static str) {
        let last = self.entries.saturating_sub(1);
        if self.hit { (format!("X-Bench-{last:04}"), "v") } else { (format!("X-Bench-{last:04}"), "miss") }
    }

    pub fn negotiation(&self) -> HttpHeaderNegotiation {
        let registry = ConfigurableLanguageRegistry::new("en").with_standard_language("en").with_standard_language("de");
        HttpHeaderNegotiation::new(
            Arc::new(MemoryConfigStore::with_config(MappingsConfig::new(self.table()))),
            Arc::new(registry),
        )
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}
