//! Categorical filtering on Genre and Year.

use crate::config::columns;
use crate::{Dataset, Result, Value};
use serde::{Deserialize, Serialize};

/// Chosen Genre and Year values. An empty list means no choice was made.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub genres: Vec<Value>,
    pub years: Vec<Value>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add chosen genres.
    pub fn with_genres<I, V>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.genres.extend(genres.into_iter().map(Into::into));
        self
    }

    /// Add chosen years.
    pub fn with_years<I, V>(mut self, years: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.years.extend(years.into_iter().map(Into::into));
        self
    }

    /// Filtering only happens when both dimensions have a selection.
    pub fn is_active(&self) -> bool {
        !self.genres.is_empty() && !self.years.is_empty()
    }
}

/// Values offered for selection, per dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub genres: Vec<Value>,
    pub years: Vec<Value>,
}

/// Distinct Genre and Year values in first-appearance order.
///
/// A dimension whose column is absent offers nothing, which keeps any
/// selection built from these options in the pass-through branch.
pub fn filter_options(dataset: &Dataset) -> FilterOptions {
    FilterOptions {
        genres: distinct_values(dataset, columns::GENRE),
        years: distinct_values(dataset, columns::YEAR),
    }
}

fn distinct_values(dataset: &Dataset, column: &str) -> Vec<Value> {
    let mut seen: Vec<Value> = Vec::new();
    if let Some(values) = dataset.column_values(column) {
        for value in values {
            if !value.is_missing() && !seen.contains(value) {
                seen.push(value.clone());
            }
        }
    }
    seen
}

/// Return indices of rows that pass the selection.
///
/// Rows pass when their Genre is among the chosen genres and their Year is
/// among the chosen years. If either list is empty no filtering happens at
/// all and every index is returned, even when the other list would exclude
/// rows. The same pass-through applies when the Genre or Year column is
/// absent. Ragged rows fail with `FormatError`.
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Result<Vec<usize>> {
    dataset.validate()?;
    let all = || Ok((0..dataset.row_count()).collect());

    if !selection.is_active() {
        return all();
    }

    let (genre_col, year_col) = match (
        dataset.column_index(columns::GENRE),
        dataset.column_index(columns::YEAR),
    ) {
        (Some(g), Some(y)) => (g, y),
        _ => {
            log::warn!("Genre or Year column missing; filter selection ignored");
            return all();
        }
    };

    Ok(dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            selection.genres.contains(&row[genre_col]) && selection.years.contains(&row[year_col])
        })
        .map(|(i, _)| i)
        .collect())
}

/// Apply a selection, returning the matching rows in original order.
pub fn apply_filters(dataset: &Dataset, selection: &FilterSelection) -> Result<Dataset> {
    if !selection.is_active() {
        dataset.validate()?;
        return Ok(dataset.clone());
    }
    let indices = filtered_indices(dataset, selection)?;
    log::debug!(
        "Filter kept {} of {} rows",
        indices.len(),
        dataset.row_count()
    );
    Ok(dataset.select_rows(&indices))
}
