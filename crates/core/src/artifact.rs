//! Downloadable report artifacts.

use serde::{Deserialize, Serialize};

/// The kind of document an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactFormat {
    /// Comma-separated export of the filtered dataset.
    Csv,
    /// Fixed-layout document report.
    Pdf,
    /// Slide-deck report.
    Pptx,
}

impl ArtifactFormat {
    /// MIME type of the artifact.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Pdf => "application/pdf",
            Self::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }

    /// Suggested download file name.
    pub fn suggested_filename(self) -> &'static str {
        match self {
            Self::Csv => "filtered_movie_data.csv",
            Self::Pdf => "movie_report.pdf",
            Self::Pptx => "movie_report.pptx",
        }
    }
}

/// A finished, immutable output buffer tagged with its format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    format: ArtifactFormat,
    bytes: Vec<u8>,
}

impl Artifact {
    /// Wrap finished bytes.
    pub fn new(format: ArtifactFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    pub fn format(&self) -> ArtifactFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Take ownership of the bytes, consuming the artifact.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn suggested_filename(&self) -> &'static str {
        self.format.suggested_filename()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_filenames() {
        assert_eq!(ArtifactFormat::Csv.suggested_filename(), "filtered_movie_data.csv");
        assert_eq!(ArtifactFormat::Pdf.suggested_filename(), "movie_report.pdf");
        assert_eq!(ArtifactFormat::Pptx.mime_type().rsplit('.').next(), Some("presentation"));
    }

    #[test]
    fn test_artifact_accessors() {
        let artifact = Artifact::new(ArtifactFormat::Csv, b"Film\n".to_vec());
        assert_eq!(artifact.format(), ArtifactFormat::Csv);
        assert_eq!(artifact.len(), 5);
        assert_eq!(artifact.into_bytes(), b"Film\n".to_vec());
    }
}
