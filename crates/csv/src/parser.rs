//! CSV dataset parser.

use movie_core::{Dataset, Error, Result, Value};
use std::io::Read;

/// Parser for comma-separated movie datasets.
///
/// The first record is the header. Cells are read verbatim and typed per
/// column with [`Dataset::settle_column_types`]; no trimming is applied.
pub struct CsvParser;

impl CsvParser {
    /// Create a new CSV parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a dataset from a reader.
    ///
    /// Rows whose width differs from the header fail with `FormatError`.
    pub fn parse<R: Read>(&self, reader: R) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| Error::FormatError(format!("Failed to read CSV header: {}", e)))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        if columns.is_empty() {
            return Err(Error::FormatError("CSV input has no header row".into()));
        }

        let mut rows = Vec::new();
        for (row_no, record) in reader.records().enumerate() {
            let record = record
                .map_err(|e| Error::FormatError(format!("CSV row {}: {}", row_no + 1, e)))?;
            rows.push(record.iter().map(raw_cell).collect());
        }

        log::debug!("Parsed CSV with {} columns and {} rows", columns.len(), rows.len());

        let mut dataset = Dataset::new(columns, rows)?;
        dataset.settle_column_types()?;
        Ok(dataset)
    }

    /// Parse a dataset from an in-memory buffer.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Dataset> {
        self.parse(bytes)
    }
}

fn raw_cell(field: &str) -> Value {
    if field.is_empty() {
        Value::Missing
    } else {
        Value::Text(field.to_string())
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typed_cells() {
        let input = "Film,Genre,Rotten Tomatoes Ratings %,Year of release\n\
                     \"10,000 B.C.\",Adventure,9,2008\n\
                     Up,Animation,,2009\n";
        let dataset = CsvParser::new().parse_bytes(input.as_bytes()).unwrap();

        assert_eq!(dataset.columns.len(), 4);
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.get(0, "Film"), Some(&Value::from("10,000 B.C.")));
        assert!(matches!(
            dataset.get(0, "Year of release"),
            Some(Value::Integer(2008))
        ));
        assert_eq!(dataset.get(1, "Rotten Tomatoes Ratings %"), Some(&Value::Missing));
    }

    #[test]
    fn test_text_column_keeps_numeric_looking_titles() {
        let input = "Film,Genre,Year\n007,Action,1962\nUp,Animation,2009\n1e3,Drama,\n";
        let dataset = CsvParser::new().parse_bytes(input.as_bytes()).unwrap();

        assert_eq!(dataset.get(0, "Film"), Some(&Value::from("007")));
        assert_eq!(dataset.get(2, "Film"), Some(&Value::from("1e3")));
        assert!(matches!(dataset.get(0, "Year"), Some(Value::Integer(1962))));
        assert_eq!(dataset.get(2, "Year"), Some(&Value::Missing));
    }

    #[test]
    fn test_ragged_rows_are_format_error() {
        let input = "Film,Genre\nUp,Animation,extra\n";
        let result = CsvParser::new().parse_bytes(input.as_bytes());
        assert!(matches!(result, Err(Error::FormatError(_))));
    }

    #[test]
    fn test_empty_input_is_format_error() {
        let result = CsvParser::new().parse_bytes(b"");
        assert!(matches!(result, Err(Error::FormatError(_))));
    }

    #[test]
    fn test_invalid_utf8_is_format_error() {
        let result = CsvParser::new().parse_bytes(b"Film\n\xff\xfe\n");
        assert!(matches!(result, Err(Error::FormatError(_))));
    }

    #[test]
    fn test_header_only() {
        let dataset = CsvParser::new().parse_bytes(b"Film,Genre\n").unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.columns, vec!["Film", "Genre"]);
    }
}
