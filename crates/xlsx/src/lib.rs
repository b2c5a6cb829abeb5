//! Spreadsheet (Office Open XML workbook) backend for movie dataset ingestion.
//!
//! Reads the first worksheet of an .xlsx workbook into a [`movie_core::Dataset`].

pub mod parser;

pub use parser::XlsxParser;
