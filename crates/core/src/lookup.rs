//! Interface to an external movie-metadata service.
//!
//! The analytics engine never calls this; frontends use it to show live
//! details for a single title.

use crate::Result;
use serde::{Deserialize, Serialize};

/// A single title's details, using the service's field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieMetadata {
    #[serde(rename = "Title", default)]
    pub title: String,

    #[serde(rename = "Year", default)]
    pub year: String,

    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,

    #[serde(rename = "Genre", default)]
    pub genre: String,

    #[serde(rename = "Director", default)]
    pub director: String,

    #[serde(rename = "Actors", default)]
    pub actors: String,

    #[serde(rename = "Runtime", default)]
    pub runtime: String,

    #[serde(rename = "Plot", default)]
    pub plot: String,

    /// Poster URL, or `"N/A"`.
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

impl MovieMetadata {
    /// Poster URL, unless the service reported none.
    pub fn poster_url(&self) -> Option<&str> {
        match self.poster.as_str() {
            "" | "N/A" => None,
            url => Some(url),
        }
    }
}

/// Look up a title. `Ok(None)` means the service has no such title.
pub trait MetadataLookup {
    fn lookup(&self, title: &str) -> Result<Option<MovieMetadata>>;
}
