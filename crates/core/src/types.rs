//! Domain types for representing an in-memory movie dataset.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single dynamically-typed cell.
///
/// Columns carry no static type; each operation coerces the cells it reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Empty cell.
    #[default]
    Missing,
    /// Whole number.
    Integer(i64),
    /// Finite floating point number.
    Float(f64),
    /// Anything that is not a number.
    Text(String),
}

impl Value {
    /// Infer a cell from its textual form.
    ///
    /// Empty text is missing, then integer, then finite float, otherwise text.
    pub fn parse_cell(raw: &str) -> Self {
        if raw.is_empty() {
            return Value::Missing;
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Integer(i);
        }
        match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => Value::Float(f),
            _ => Value::Text(raw.to_string()),
        }
    }

    /// Whether the cell is empty.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric coercion used by comparisons.
    ///
    /// Text is accepted when its trimmed content is a finite number. Anything
    /// else yields `None`, which callers treat the same as a missing cell.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) if f.is_finite() => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }

    /// Whether this cell would read as a number in a numeric column.
    fn reads_as_number(&self) -> bool {
        match self {
            Value::Integer(_) | Value::Float(_) => true,
            Value::Text(s) => !matches!(Value::parse_cell(s), Value::Text(_)),
            Value::Missing => false,
        }
    }

    fn strict_numeric(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Missing, Value::Missing) => true,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            // Mixed integer/float compares by numeric value.
            _ => match (self.strict_numeric(), other.strict_numeric()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{v:.1}")
            }
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// An ordered table of rows, each holding one cell per column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Column labels, in source order.
    pub columns: Vec<String>,

    /// Rows in source order; `rows[r][c]` belongs to `columns[c]`.
    pub rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Build a dataset, rejecting rows whose width differs from the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let dataset = Self { columns, rows };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Create a dataset with the given columns and no rows.
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Check that every row has exactly one cell per column.
    pub fn validate(&self) -> Result<()> {
        let width = self.columns.len();
        for (idx, row) in self.rows.iter().enumerate() {
            if row.len() != width {
                return Err(Error::FormatError(format!(
                    "row {} has {} cells but the header has {} columns",
                    idx + 1,
                    row.len(),
                    width
                )));
            }
        }
        Ok(())
    }

    /// Settle each column on a single type.
    ///
    /// A column is numeric only when every non-missing cell reads as a number;
    /// its text cells are then parsed. Any other column keeps its cells as
    /// text, so numeric-looking labels such as `007` stay untouched.
    pub fn settle_column_types(&mut self) -> Result<()> {
        self.validate()?;
        for col in 0..self.columns.len() {
            let numeric = self
                .rows
                .iter()
                .map(|row| &row[col])
                .filter(|cell| !cell.is_missing())
                .all(Value::reads_as_number);

            for row in &mut self.rows {
                let cell = &mut row[col];
                let settled = match &*cell {
                    Value::Text(s) if numeric => Value::parse_cell(s),
                    Value::Integer(_) | Value::Float(_) if !numeric => {
                        Value::Text(cell.to_string())
                    }
                    _ => continue,
                };
                *cell = settled;
            }
        }
        Ok(())
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with this label.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Whether a column with this label exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `row` in the named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// All cells of the named column, in row order.
    pub fn column_values(&self, name: &str) -> Option<Vec<&Value>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|r| r.get(col)).collect())
    }

    /// Copy of the first `n` rows.
    pub fn head(&self, n: usize) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Copy of the rows at the given indices, in the order given.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }
}

/// The tabular format of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabularFormat {
    /// Comma-separated text.
    Csv,
    /// Spreadsheet-native (Office Open XML workbook).
    Xlsx,
}

impl TabularFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xlsm" => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        // XLSX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Xlsx);
        }
        None
    }

    /// Pick the parser for an upload. The file-name hint wins; magic bytes
    /// are only consulted when the hint has no recognised extension.
    pub fn detect(filename: &str, bytes: &[u8]) -> Result<Self> {
        filename
            .rsplit_once('.')
            .and_then(|(_, ext)| Self::from_extension(ext))
            .or_else(|| Self::from_magic(bytes))
            .ok_or_else(|| {
                Error::FormatError(format!(
                    "'{}' is neither comma-separated text nor a spreadsheet",
                    filename
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_inference() {
        assert_eq!(Value::parse_cell(""), Value::Missing);
        assert!(matches!(Value::parse_cell("2001"), Value::Integer(2001)));
        assert!(matches!(Value::parse_cell("7.5"), Value::Float(f) if f == 7.5));
        assert!(matches!(Value::parse_cell("Drama"), Value::Text(ref s) if s == "Drama"));
        assert!(matches!(Value::parse_cell("NaN"), Value::Text(_)));
    }

    #[test]
    fn test_mixed_numeric_equality() {
        assert_eq!(Value::Integer(2001), Value::Float(2001.0));
        assert_ne!(Value::Integer(2001), Value::Text("2001".into()));
        assert_ne!(Value::Missing, Value::Text(String::new()));
    }

    #[test]
    fn test_as_f64_fails_closed() {
        assert_eq!(Value::Integer(90).as_f64(), Some(90.0));
        assert_eq!(Value::Text(" 42.5 ".into()).as_f64(), Some(42.5));
        assert_eq!(Value::Text("n/a".into()).as_f64(), None);
        assert_eq!(Value::Text("inf".into()).as_f64(), None);
        assert_eq!(Value::Missing.as_f64(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Integer(90).to_string(), "90");
        assert_eq!(Value::Float(90.0).to_string(), "90.0");
        assert_eq!(Value::Float(7.25).to_string(), "7.25");
        assert_eq!(Value::Missing.to_string(), "");
        assert_eq!(Value::from("Up").to_string(), "Up");
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let result = Dataset::new(
            vec!["Film".into(), "Genre".into()],
            vec![vec!["A".into(), "Drama".into()], vec!["B".into()]],
        );
        assert!(matches!(result, Err(Error::FormatError(_))));
    }

    #[test]
    fn test_settle_column_types() {
        let mut dataset = Dataset::new(
            vec!["Film".into(), "Year".into(), "Code".into()],
            vec![
                vec!["007".into(), "1962".into(), Value::Integer(7)],
                vec!["Up".into(), "2009.0".into(), "x7".into()],
                vec!["1e3".into(), Value::Missing, Value::Missing],
            ],
        )
        .unwrap();
        dataset.settle_column_types().unwrap();

        assert!(matches!(&dataset.rows[0][0], Value::Text(s) if s == "007"));
        assert!(matches!(&dataset.rows[2][0], Value::Text(s) if s == "1e3"));
        assert!(matches!(dataset.rows[0][1], Value::Integer(1962)));
        assert!(matches!(dataset.rows[1][1], Value::Float(f) if f == 2009.0));
        assert_eq!(dataset.rows[2][1], Value::Missing);
        assert!(matches!(&dataset.rows[0][2], Value::Text(s) if s == "7"));
    }

    #[test]
    fn test_settle_rejects_ragged_rows() {
        let mut dataset = Dataset {
            columns: vec!["Film".into(), "Year".into()],
            rows: vec![vec!["A".into()]],
        };
        assert!(matches!(
            dataset.settle_column_types(),
            Err(Error::FormatError(_))
        ));
    }

    #[test]
    fn test_column_access() {
        let dataset = Dataset::new(
            vec!["Film".into(), "Year".into()],
            vec![
                vec!["A".into(), Value::Integer(2001)],
                vec!["B".into(), Value::Integer(2002)],
            ],
        )
        .unwrap();

        assert!(dataset.has_column("Year"));
        assert!(!dataset.has_column("Genre"));
        assert_eq!(dataset.get(1, "Film"), Some(&Value::from("B")));
        assert_eq!(dataset.column_values("Year").unwrap().len(), 2);
        assert_eq!(dataset.head(1).row_count(), 1);
        assert_eq!(dataset.select_rows(&[1]).rows[0][0], Value::from("B"));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(TabularFormat::detect("movies.CSV", b"Film").unwrap(), TabularFormat::Csv);
        assert_eq!(TabularFormat::detect("movies.xlsx", b"").unwrap(), TabularFormat::Xlsx);
        assert_eq!(
            TabularFormat::detect("upload", &[0x50, 0x4B, 0x03, 0x04, 0x00]).unwrap(),
            TabularFormat::Xlsx
        );
        assert!(matches!(
            TabularFormat::detect("notes.txt", b"hello"),
            Err(Error::FormatError(_))
        ));
    }
}
