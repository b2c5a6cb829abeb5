//! Comma-separated backend: dataset ingestion and flat-file export.

pub mod export;
pub mod parser;

pub use export::CsvExporter;
pub use parser::CsvParser;
