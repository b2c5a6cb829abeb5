//! Dataset summary shown on the report's summary slide.

use crate::config::columns;
use crate::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Row count plus the distinct genre and year labels of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub row_count: usize,

    /// `None` when the Genre column is absent.
    pub genres: Option<Vec<String>>,

    /// `None` when the Year column is absent.
    pub years: Option<Vec<String>>,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            row_count: dataset.row_count(),
            genres: distinct_labels(dataset, columns::GENRE),
            years: distinct_labels(dataset, columns::YEAR),
        }
    }

    /// `"Genres: a, b"`, if genre data is available.
    pub fn genres_line(&self) -> Option<String> {
        self.genres
            .as_ref()
            .map(|g| format!("Genres: {}", g.join(", ")))
    }

    /// `"Years: a, b"`, if year data is available.
    pub fn years_line(&self) -> Option<String> {
        self.years
            .as_ref()
            .map(|y| format!("Years: {}", y.join(", ")))
    }
}

/// Distinct labels sorted as strings, so "10" sorts before "2".
fn distinct_labels(dataset: &Dataset, column: &str) -> Option<Vec<String>> {
    let values = dataset.column_values(column)?;
    let labels: BTreeSet<String> = values
        .into_iter()
        .filter(|v| !v.is_missing())
        .map(|v| v.to_string())
        .collect();
    Some(labels.into_iter().collect())
}
