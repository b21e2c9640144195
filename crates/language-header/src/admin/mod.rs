//! Administration of the header mappings.
//!
//! [`MappingForm`] renders the stored mappings as editable rows plus one empty row for
//! a new mapping, and turns a submission back into a full replacement of the stored
//! table. Incomplete rows are not reported as errors: they are dropped, and reported
//! back in [`SubmitOutcome::dropped`] so a caller may surface them.

mod options;
mod submission;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, ConfigStore};
use crate::mapping::{MappingTable, MappingsConfig};
use crate::registry::LanguageRegistry;

pub use options::{LanguageOptions, OptionGroup, EXISTING_LANGUAGES, LANGUAGES_NOT_YET_ADDED};
pub use submission::{DroppedRow, FormSubmission, MappingRow, Validation};

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("config error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("invalid form submission: {reason}")]
    InvalidSubmission { reason: String },
}

impl AdminError {
    pub fn invalid_submission<S: ToString>(str: S) -> Self {
        Self::InvalidSubmission { reason: str.to_string() }
    }
}

/// Everything needed to render the mapping form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingFormView {
    pub form_id: &'static str,
    pub header: [&'static str; 3],
    pub empty: &'static str,
    /// One row per stored mapping, in stored order.
    pub rows: Vec<MappingRow>,
    pub new_mapping: MappingRow,
    pub options: LanguageOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// The table that was saved, `None` when no row was valid and nothing was written.
    pub saved: Option<MappingTable>,
    pub dropped: Vec<DroppedRow>,
}

pub struct MappingForm {
    config: Arc<dyn ConfigStore>,
    registry: Arc<dyn LanguageRegistry>,
}

impl fmt::Debug for MappingForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingForm").field("form_id", &Self::FORM_ID).finish_non_exhaustive()
    }
}

impl MappingForm {
    pub const FORM_ID: &'static str = "language_negotiation_configure_header_form";

    pub fn new(config: Arc<dyn ConfigStore>, registry: Arc<dyn LanguageRegistry>) -> Self {
        Self { config, registry }
    }

    /// The stored mappings, empty when nothing was saved yet.
    pub fn mappings(&self) -> Result<MappingTable, ConfigError> {
        Ok(self.config.load()?.map(|config| config.map).unwrap_or_default())
    }

    pub fn build(&self) -> Result<MappingFormView, ConfigError> {
        let rows = self
            .mappings()?
            .iter()
            .map(|(key, langcode)| MappingRow::new(key.name(), key.value(), langcode))
            .collect();

        Ok(MappingFormView {
            form_id: Self::FORM_ID,
            header: ["Header name", "Header value", "Site language"],
            empty: "No header language mappings available.",
            rows,
            new_mapping: MappingRow::default(),
            options: LanguageOptions::from_registry(self.registry.as_ref()),
        })
    }

    /// Replaces the stored mappings with the valid rows of `submission`, sorted by key.
    ///
    /// When no row is valid the stored mappings are left as they are.
    pub fn submit(&self, submission: &FormSubmission) -> Result<SubmitOutcome, ConfigError> {
        let Validation { mut accepted, dropped } = submission.validate();

        for dropped_row in dropped.iter().filter(|dropped_row| !dropped_row.is_blank()) {
            warn!(
                header_name = %dropped_row.row.header_name,
                header_value = %dropped_row.row.header_value,
                reason = %dropped_row.reason,
                "dropping header mapping row"
            );
        }

        if accepted.is_empty() {
            debug!("no valid header mapping submitted, keeping stored mappings");
            return Ok(SubmitOutcome { saved: None, dropped });
        }

        accepted.sort_keys();
        self.config.save(&MappingsConfig::new(accepted.clone()))?;
        info!(entries = accepted.len(), "saved header language mappings");

        Ok(SubmitOutcome { saved: Some(accepted), dropped })
    }

    /// Decodes a urlencoded form body and submits it.
    pub fn submit_urlencoded(&self, body: &str) -> Result<SubmitOutcome, AdminError> {
        let submission = FormSubmission::from_urlencoded(body)?;
        Ok(self.submit(&submission)?)
    }
}
