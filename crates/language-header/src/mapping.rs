//! Header to language mapping table.
//!
//! A mapping entry pairs a request header name and value with a site language code.
//! Entries are kept in an ordered table, and the order is meaningful: negotiation
//! walks the table front to back and stops at the first entry matching the request.
//! The table is sorted once, when it is saved, and read back in stored order.
//!
//! On the persistence boundary each key is rendered as the composite string
//! `name:value`, and parsed back by splitting on the first `:` only.

use std::cmp::Ordering;
use std::fmt;
use std::iter;

use http::{HeaderMap, HeaderName};
use indexmap::IndexMap;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Separates the header name from the header value in a composite key.
pub const KEY_DELIMITER: char = ':';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingKeyError {
    #[error("header name is empty")]
    EmptyName,

    #[error("header name '{name}' contains the key delimiter")]
    DelimiterInName { name: String },
}

impl MappingKeyError {
    pub fn delimiter_in_name<S: ToString>(name: S) -> Self {
        Self::DelimiterInName { name: name.to_string() }
    }
}

/// The `(header name, header value)` pair a mapping entry is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingKey {
    name: String,
    value: String,
}

impl MappingKey {
    /// Creates a key from user supplied input, trimming both fields.
    ///
    /// The value may be empty, the name may not. A name containing [`KEY_DELIMITER`]
    /// is rejected since it could not be read back once persisted.
    pub fn new(name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self, MappingKeyError> {
        let name = name.as_ref().trim();
        let value = value.as_ref().trim();

        if name.is_empty() {
            return Err(MappingKeyError::EmptyName);
        }

        if name.contains(KEY_DELIMITER) {
            return Err(MappingKeyError::delimiter_in_name(name));
        }

        Ok(Self { name: name.to_owned(), value: value.to_owned() })
    }

    /// Parses a persisted composite key.
    ///
    /// Splits on the first delimiter only, so `X-Tag:a:b` has the value `a:b`.
    /// A composite without any delimiter is a name with an empty value.
    pub fn parse(composite: &str) -> Self {
        match composite.split_once(KEY_DELIMITER) {
            Some((name, value)) => Self { name: name.to_owned(), value: value.to_owned() },
            None => Self { name: composite.to_owned(), value: String::new() },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Renders the key as it is persisted: `name:value`.
    pub fn composite(&self) -> String {
        let mut composite = String::with_capacity(self.name.len() + self.value.len() + 1);
        composite.push_str(&self.name);
        composite.push(KEY_DELIMITER);
        composite.push_str(&self.value);
        composite
    }

    /// Checks whether the request headers carry this header with exactly this value.
    ///
    /// Header names compare case-insensitively, values byte for byte. Only the first
    /// value of a repeated header is considered.
    pub fn matches(&self, headers: &HeaderMap) -> bool {
        let Ok(header_name) = HeaderName::from_bytes(self.name.as_bytes()) else {
            return false;
        };

        headers.get(&header_name).is_some_and(|value| value.as_bytes() == self.value.as_bytes())
    }

    fn composite_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.name.bytes().chain(iter::once(KEY_DELIMITER as u8)).chain(self.value.bytes())
    }
}

// keys order like their composite strings, so sorting keys and sorting persisted
// strings always agree
impl Ord for MappingKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.composite_bytes().cmp(other.composite_bytes())
    }
}

impl PartialOrd for MappingKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MappingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, KEY_DELIMITER, self.value)
    }
}

impl Serialize for MappingKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.composite())
    }
}

impl<'de> Deserialize<'de> for MappingKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CompositeVisitor;

        impl Visitor<'_> for CompositeVisitor {
            type Value = MappingKey;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a `name:value` mapping key")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(MappingKey::parse(v))
            }
        }

        deserializer.deserialize_str(CompositeVisitor)
    }
}

/// Ordered map from [`MappingKey`] to language code.
///
/// Two tables are equal only when they hold the same entries in the same order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingTable {
    entries: IndexMap<MappingKey, String>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing the language code of an existing key.
    pub fn insert(&mut self, key: MappingKey, langcode: impl Into<String>) -> Option<String> {
        self.entries.insert(key, langcode.into())
    }

    pub fn get(&self, key: &MappingKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorts the entries ascending by composite key.
    pub fn sort_keys(&mut self) {
        self.entries.sort_keys();
    }

    /// Iterates the entries in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&MappingKey, &str)> {
        self.entries.iter().map(|(key, langcode)| (key, langcode.as_str()))
    }

    /// Returns the first entry, in stored order, matching the request headers.
    pub fn find_match(&self, headers: &HeaderMap) -> Option<(&MappingKey, &str)> {
        self.iter().find(|(key, _)| key.matches(headers))
    }
}

impl PartialEq for MappingTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for MappingTable {}

impl FromIterator<(MappingKey, String)> for MappingTable {
    fn from_iter<T: IntoIterator<Item = (MappingKey, String)>>(iter: T) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

/// The `language_header.mappings` configuration entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingsConfig {
    #[serde(default)]
    pub map: MappingTable,
}

impl MappingsConfig {
    pub const NAME: &'static str = "language_header.mappings";

    pub fn new(map: MappingTable) -> Self {
        Self { map }
    }
}
