//! Flat-file export of a dataset.

use movie_core::{Artifact, ArtifactFormat, Dataset, Error, Result};

/// Serializes a dataset to UTF-8 comma-separated text.
///
/// Header first, then every row, both in the dataset's current order.
/// Missing cells become empty fields; fields containing commas, quotes or
/// newlines are quoted. Re-parsing the output with [`crate::CsvParser`]
/// reproduces the same cells as long as each column holds a single type.
#[derive(Debug, Clone, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    /// Render the dataset as a CSV artifact.
    pub fn export(&self, dataset: &Dataset) -> Result<Artifact> {
        dataset.validate()?;

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer
            .write_record(&dataset.columns)
            .map_err(|e| Error::CsvError(format!("Failed to write header: {}", e)))?;

        for (idx, row) in dataset.rows.iter().enumerate() {
            writer
                .write_record(row.iter().map(|v| v.to_string()))
                .map_err(|e| Error::CsvError(format!("Failed to write row {}: {}", idx + 1, e)))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::CsvError(format!("Failed to flush CSV: {}", e)))?;

        log::debug!("Exported {} rows ({} bytes)", dataset.row_count(), bytes.len());

        Ok(Artifact::new(ArtifactFormat::Csv, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CsvParser;
    use movie_core::Value;

    fn sample() -> Dataset {
        Dataset::new(
            vec![
                "Film".into(),
                "Genre".into(),
                "Year".into(),
                "CriticRating".into(),
                "BudgetMillions".into(),
            ],
            vec![
                vec![
                    "Crazy, Stupid, Love.".into(),
                    "Comedy".into(),
                    Value::Integer(2011),
                    Value::Integer(78),
                    Value::Float(50.5),
                ],
                vec![
                    "The \"Quoted\" One".into(),
                    "Drama".into(),
                    Value::Integer(2009),
                    Value::Missing,
                    Value::Float(12.0),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_export_layout() {
        let artifact = CsvExporter::new().export(&sample()).unwrap();
        let text = String::from_utf8(artifact.bytes().to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(artifact.format(), ArtifactFormat::Csv);
        assert_eq!(lines[0], "Film,Genre,Year,CriticRating,BudgetMillions");
        assert_eq!(lines[1], "\"Crazy, Stupid, Love.\",Comedy,2011,78,50.5");
        assert_eq!(lines[2], "\"The \"\"Quoted\"\" One\",Drama,2009,,12.0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_round_trip() {
        let source = sample();
        let artifact = CsvExporter::new().export(&source).unwrap();
        let parsed = CsvParser::new().parse_bytes(artifact.bytes()).unwrap();
        assert_eq!(parsed, source);
    }

    #[test]
    fn test_raw_text_survives_parse_and_export() {
        let input = "Film,Genre\n007,Action\nUp,Animation\n1e3,Drama\n";
        let dataset = CsvParser::new().parse_bytes(input.as_bytes()).unwrap();
        let artifact = CsvExporter::new().export(&dataset).unwrap();
        assert_eq!(artifact.bytes(), input.as_bytes());
    }

    #[test]
    fn test_repeat_export_is_identical() {
        let exporter = CsvExporter::new();
        let first = exporter.export(&sample()).unwrap();
        let second = exporter.export(&sample()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_dataset_exports_header() {
        let dataset = Dataset::with_columns(vec!["Film".into(), "Genre".into()]);
        let artifact = CsvExporter::new().export(&dataset).unwrap();
        assert_eq!(artifact.bytes(), b"Film,Genre\n");
    }
}
