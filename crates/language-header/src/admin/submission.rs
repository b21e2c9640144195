use serde::{Deserialize, Serialize};

use crate::admin::AdminError;
use crate::mapping::{MappingKey, MappingKeyError, MappingTable};

/// One row of the mapping form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRow {
    #[serde(default)]
    pub header_name: String,
    #[serde(default)]
    pub header_value: String,
    #[serde(default)]
    pub langcode: String,
}

impl MappingRow {
    pub fn new(header_name: impl Into<String>, header_value: impl Into<String>, langcode: impl Into<String>) -> Self {
        Self { header_name: header_name.into(), header_value: header_value.into(), langcode: langcode.into() }
    }

    pub fn key(&self) -> Result<MappingKey, MappingKeyError> {
        MappingKey::new(&self.header_name, &self.header_value)
    }
}

/// The values posted by the mapping form: the edited existing rows plus the new row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FormSubmission {
    #[serde(default)]
    pub mappings: Vec<MappingRow>,
    #[serde(default)]
    pub new_mapping: MappingRow,
}

impl FormSubmission {
    pub fn new(mappings: Vec<MappingRow>, new_mapping: MappingRow) -> Self {
        Self { mappings, new_mapping }
    }

    /// Decodes an `application/x-www-form-urlencoded` body such as
    /// `mappings[0][header_name]=X-Language&mappings[0][header_value]=de&mappings[0][langcode]=de`.
    pub fn from_urlencoded(body: &str) -> Result<Self, AdminError> {
        serde_qs::from_str(body).map_err(AdminError::invalid_submission)
    }

    /// Splits the rows into the mapping table they describe and the rows that were dropped.
    ///
    /// Rows are read in order, the new row last, so a later row with the same key
    /// replaces the language of an earlier one.
    pub fn validate(&self) -> Validation {
        let mut accepted = MappingTable::new();
        let mut dropped = vec![];

        for row in self.mappings.iter().chain(Some(&self.new_mapping)) {
            match row.key() {
                Ok(key) => {
                    accepted.insert(key, row.langcode.as_str());
                }
                Err(reason) => dropped.push(DroppedRow { row: row.clone(), reason }),
            }
        }

        Validation { accepted, dropped }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub accepted: MappingTable,
    pub dropped: Vec<DroppedRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    pub row: MappingRow,
    pub reason: MappingKeyError,
}

impl DroppedRow {
    /// Whether the row was simply left blank, as the new row usually is.
    pub fn is_blank(&self) -> bool {
        self.reason == MappingKeyError::EmptyName && self.row.header_value.trim().is_empty()
    }
}
