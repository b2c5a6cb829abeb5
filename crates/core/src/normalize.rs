//! Schema normalization for uploaded movie datasets.
//!
//! Renames legacy column labels to the canonical schema. Row count, row
//! order and cell values are never touched.

use crate::config::AliasMap;
use crate::{Dataset, Result};

/// Renames aliased columns to their canonical labels.
#[derive(Debug, Clone, Default)]
pub struct SchemaNormalizer {
    aliases: AliasMap,
}

impl SchemaNormalizer {
    /// Create a normalizer with the given alias map.
    pub fn new(aliases: AliasMap) -> Self {
        Self { aliases }
    }

    /// The alias map in use.
    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    /// Canonical label for a single column label.
    pub fn normalize_label(&self, label: &str) -> String {
        self.aliases
            .canonical(label)
            .map(str::to_string)
            .unwrap_or_else(|| label.to_string())
    }

    /// Return a renamed copy of a shared dataset.
    ///
    /// Fails with `FormatError` if the dataset is ragged.
    pub fn normalize(&self, dataset: &Dataset) -> Result<Dataset> {
        self.normalize_owned(dataset.clone())
    }

    /// Rename the columns of a dataset the caller no longer needs.
    pub fn normalize_owned(&self, mut dataset: Dataset) -> Result<Dataset> {
        dataset.validate()?;

        for column in dataset.columns.iter_mut() {
            if let Some(canonical) = self.aliases.canonical(column) {
                log::debug!("Renaming column '{}' to '{}'", column, canonical);
                *column = canonical.to_string();
            }
        }

        Ok(dataset)
    }
}
