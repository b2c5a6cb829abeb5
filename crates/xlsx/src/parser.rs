//! XLSX dataset parser implementation.

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use movie_core::{Dataset, Error, Result, Value};
use std::io::{Cursor, Read, Seek};

/// Largest magnitude at which an integral float is still exactly an integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Parser for spreadsheet-native movie datasets.
pub struct XlsxParser;

impl XlsxParser {
    /// Create a new XLSX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse the first worksheet of a workbook from a reader.
    ///
    /// The first row is the header. Integral numbers come back as integers,
    /// error cells are treated as missing, and a column holding any text
    /// cell is kept as text throughout.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<Dataset> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(reader)
            .map_err(|e| Error::FormatError(format!("Failed to open workbook: {}", e)))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| Error::FormatError("Workbook has no worksheets".into()))?;

        log::debug!("Reading worksheet '{}'", sheet_name);

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            Error::FormatError(format!("Failed to read worksheet '{}': {}", sheet_name, e))
        })?;

        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| Error::FormatError(format!("Worksheet '{}' is empty", sheet_name)))?;

        let columns: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(idx, cell)| header_label(cell, idx))
            .collect();

        let rows: Vec<Vec<Value>> = rows
            .map(|row| row.iter().map(cell_value).collect())
            .collect();

        log::debug!(
            "Parsed worksheet with {} columns and {} rows",
            columns.len(),
            rows.len()
        );

        let mut dataset = Dataset::new(columns, rows)?;
        dataset.settle_column_types()?;
        Ok(dataset)
    }

    /// Parse a workbook from an in-memory buffer.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Dataset> {
        self.parse(Cursor::new(bytes))
    }
}

impl Default for XlsxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Column label for a header cell; blank headers get a positional name.
fn header_label(cell: &Data, idx: usize) -> String {
    let label = cell.to_string();
    if label.is_empty() {
        format!("Unnamed: {}", idx)
    } else {
        label
    }
}

/// Convert a worksheet cell to a dataset value.
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Missing,
        Data::Int(i) => Value::Integer(*i),
        Data::Float(f) if !f.is_finite() => Value::Missing,
        Data::Float(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => {
            Value::Integer(*f as i64)
        }
        Data::Float(f) => Value::Float(*f),
        Data::String(s) if s.is_empty() => Value::Missing,
        Data::String(s) => Value::Text(s.clone()),
        other => Value::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn inline(cell_ref: &str, text: &str) -> String {
        format!(r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#, cell_ref, text)
    }

    fn number(cell_ref: &str, value: &str) -> String {
        format!(r#"<c r="{}"><v>{}</v></c>"#, cell_ref, value)
    }

    fn workbook(rows: &[String]) -> Vec<u8> {
        workbook_with_sheet_part(rows, "xl/worksheets/sheet1.xml")
    }

    fn workbook_with_sheet_part(rows: &[String], sheet_part: &str) -> Vec<u8> {
        let sheet_rows: String = rows
            .iter()
            .enumerate()
            .map(|(i, cells)| format!(r#"<row r="{}">{}</row>"#, i + 1, cells))
            .collect();

        let parts = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#.to_string(),
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#.to_string(),
            ),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Movies" sheetId="1" r:id="rId1"/></sheets></workbook>"#.to_string(),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#.to_string(),
            ),
            (
                sheet_part,
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                    sheet_rows
                ),
            ),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            zip.start_file(name, FileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_parse_first_sheet() {
        let bytes = workbook(&[
            [
                inline("A1", "Film"),
                inline("B1", "Genre"),
                inline("C1", "Rotten Tomatoes Ratings %"),
                inline("D1", "Budget (million $)"),
            ]
            .concat(),
            [
                inline("A2", "Up"),
                inline("B2", "Animation"),
                number("C2", "98"),
                number("D2", "175.5"),
            ]
            .concat(),
            [inline("A3", "Cars"), inline("B3", "Animation"), number("C3", "74")].concat(),
        ]);

        let dataset = XlsxParser::new().parse_bytes(&bytes).unwrap();

        assert_eq!(
            dataset.columns,
            vec!["Film", "Genre", "Rotten Tomatoes Ratings %", "Budget (million $)"]
        );
        assert_eq!(dataset.row_count(), 2);
        assert!(matches!(
            dataset.get(0, "Rotten Tomatoes Ratings %"),
            Some(Value::Integer(98))
        ));
        assert!(matches!(
            dataset.get(0, "Budget (million $)"),
            Some(Value::Float(f)) if *f == 175.5
        ));
        assert_eq!(dataset.get(1, "Budget (million $)"), Some(&Value::Missing));
    }

    #[test]
    fn test_mixed_column_stays_text() {
        let bytes = workbook(&[
            [inline("A1", "Film"), inline("B1", "Year")].concat(),
            [number("A2", "7"), number("B2", "1962")].concat(),
            [inline("A3", "Up"), number("B3", "2009")].concat(),
        ]);

        let dataset = XlsxParser::new().parse_bytes(&bytes).unwrap();
        assert_eq!(dataset.get(0, "Film"), Some(&Value::from("7")));
        assert!(matches!(dataset.get(1, "Year"), Some(Value::Integer(2009))));
    }

    #[test]
    fn test_missing_sheet_part_is_format_error() {
        let bytes = workbook_with_sheet_part(
            &[[inline("A1", "Film")].concat()],
            "xl/worksheets/elsewhere.xml",
        );
        let result = XlsxParser::new().parse_bytes(&bytes);
        assert!(matches!(result, Err(Error::FormatError(_))));
    }

    #[test]
    fn test_not_a_workbook_is_format_error() {
        let result = XlsxParser::new().parse_bytes(b"Film,Genre\nUp,Animation\n");
        assert!(matches!(result, Err(Error::FormatError(_))));
    }

    #[test]
    fn test_cell_value_conversion() {
        assert_eq!(cell_value(&Data::Empty), Value::Missing);
        assert!(matches!(cell_value(&Data::Float(2001.0)), Value::Integer(2001)));
        assert!(matches!(cell_value(&Data::Float(7.5)), Value::Float(_)));
        assert_eq!(cell_value(&Data::String("2001".into())), Value::from("2001"));
        assert_eq!(cell_value(&Data::Bool(true)), Value::from("true"));
    }

    #[test]
    fn test_blank_header_label() {
        assert_eq!(header_label(&Data::Empty, 3), "Unnamed: 3");
        assert_eq!(header_label(&Data::String("Film".into()), 0), "Film");
    }
}
