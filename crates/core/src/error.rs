//! Error types for movie dataset analytics and report generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while ingesting, analysing or rendering a dataset.
#[derive(Error, Debug)]
pub enum Error {
    /// The input could not be parsed as either supported tabular format,
    /// the workbook has no readable worksheet, or the table is ragged.
    #[error("Malformed tabular data: {0}")]
    FormatError(String),

    /// A column a feature depends on is absent. Callers treat this as
    /// "feature unavailable" rather than a failure.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    CsvError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML writing or parsing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),

    /// The live metadata lookup failed or timed out.
    #[error("Metadata lookup failed: {0}")]
    LookupError(String),
}

impl Error {
    /// Whether this error only disables a dependent feature.
    pub fn is_soft(&self) -> bool {
        matches!(self, Error::MissingColumn(_))
    }
}
