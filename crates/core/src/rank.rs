//! Top-N / bottom-N summaries over a numeric column.

use crate::config::{columns, EngineConfig};
use crate::{Dataset, Error, Result, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction for a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Highest values first.
    Descending,
    /// Lowest values first.
    Ascending,
}

/// One ranked row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// Film label; empty when the row has no Film cell.
    pub film: String,

    /// The ranked cell as it appeared in the dataset.
    pub value: Value,
}

impl RankedEntry {
    /// Line used by the slide report: `"<Film> – <value>"`.
    pub fn label(&self) -> String {
        format!("{} \u{2013} {}", self.film, self.value)
    }
}

/// Ordered ranking entries, at most `n` long.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedSummary {
    pub entries: Vec<RankedEntry>,
}

impl RankedSummary {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Film labels in rank order.
    pub fn films(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.film.as_str()).collect()
    }
}

/// Rank rows by a numeric column.
///
/// Rows whose cell is missing or not numeric are left out. The sort is
/// stable, so equal values keep their original relative order. Returns
/// `MissingColumn` when `field` is absent and `FormatError` for ragged rows;
/// an empty qualifying set gives an empty summary.
pub fn rank_top(
    dataset: &Dataset,
    field: &str,
    n: usize,
    direction: Direction,
) -> Result<RankedSummary> {
    dataset.validate()?;
    let field_col = dataset
        .column_index(field)
        .ok_or_else(|| Error::MissingColumn(field.to_string()))?;
    let film_col = dataset.column_index(columns::FILM);

    let mut scored: Vec<(f64, &Vec<Value>)> = dataset
        .rows
        .iter()
        .filter_map(|row| row[field_col].as_f64().map(|score| (score, row)))
        .collect();

    scored.sort_by(|a, b| {
        let ord = a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal);
        match direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    });

    let entries = scored
        .into_iter()
        .take(n)
        .map(|(_, row)| RankedEntry {
            film: film_col.map(|c| row[c].to_string()).unwrap_or_default(),
            value: row[field_col].clone(),
        })
        .collect();

    Ok(RankedSummary { entries })
}

/// Highest and lowest critic-rating summaries for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    pub highest: RankedSummary,
    pub lowest: RankedSummary,
}

impl Rankings {
    /// Rank by CriticRating in both directions.
    pub fn compute(dataset: &Dataset, config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            highest: rank_top(
                dataset,
                columns::CRITIC_RATING,
                config.top_n,
                Direction::Descending,
            )?,
            lowest: rank_top(
                dataset,
                columns::CRITIC_RATING,
                config.top_n,
                Direction::Ascending,
            )?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.highest.is_empty() && self.lowest.is_empty()
    }
}
