//! Live movie-metadata lookup against the OMDb API.

use movie_core::{Error, MetadataLookup, MovieMetadata, Result};
use std::time::Duration;

const OMDB_URL: &str = "http://www.omdbapi.com/";

/// Blocking OMDb client with a fixed request timeout.
pub struct OmdbClient {
    api_key: String,
    client: reqwest::blocking::Client,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::LookupError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            api_key: api_key.into(),
            client,
        })
    }
}

impl MetadataLookup for OmdbClient {
    fn lookup(&self, title: &str) -> Result<Option<MovieMetadata>> {
        log::debug!("Looking up '{}' on OMDb", title);

        let body: serde_json::Value = self
            .client
            .get(OMDB_URL)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .and_then(|resp| resp.json())
            .map_err(|e| Error::LookupError(e.to_string()))?;

        parse_response(body)
    }
}

/// `Response: "True"` carries a title record; anything else means not found.
fn parse_response(body: serde_json::Value) -> Result<Option<MovieMetadata>> {
    if body.get("Response").and_then(|r| r.as_str()) != Some("True") {
        return Ok(None);
    }
    serde_json::from_value(body)
        .map(Some)
        .map_err(|e| Error::LookupError(format!("Unexpected OMDb record: {}", e)))
}
