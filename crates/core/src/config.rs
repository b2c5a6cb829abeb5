//! Engine configuration, passed explicitly into the normalizer and ranking.

use serde::{Deserialize, Serialize};

/// Canonical column labels the engine depends on.
pub mod columns {
    pub const FILM: &str = "Film";
    pub const GENRE: &str = "Genre";
    pub const YEAR: &str = "Year";
    pub const CRITIC_RATING: &str = "CriticRating";
    pub const AUDIENCE_RATING: &str = "AudienceRating";
    pub const BUDGET_MILLIONS: &str = "BudgetMillions";
}

/// Legacy source labels and the canonical labels they map to.
const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("Rotten Tomatoes Ratings %", columns::CRITIC_RATING),
    ("Audience Ratings %", columns::AUDIENCE_RATING),
    ("Budget (million $)", columns::BUDGET_MILLIONS),
    ("Year of release", columns::YEAR),
];

/// Mapping from source column label to canonical label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasMap {
    entries: Vec<(String, String)>,
}

impl AliasMap {
    /// The fixed mapping for the movie ratings spreadsheet layout.
    pub fn legacy() -> Self {
        Self {
            entries: LEGACY_ALIASES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    /// Canonical label for a source label, if it is an alias.
    pub fn canonical(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(from, _)| from == label)
            .map(|(_, to)| to.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AliasMap {
    fn default() -> Self {
        Self::legacy()
    }
}

/// Settings shared by one analytics request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Column renames applied at ingestion.
    pub aliases: AliasMap,

    /// Entries kept in each ranked summary.
    pub top_n: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            aliases: AliasMap::legacy(),
            top_n: 3,
        }
    }
}
