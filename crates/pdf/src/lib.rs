//! PDF document report for movie rating rankings.
//!
//! [`canvas`] is a minimal top-down text canvas producing PDF 1.4 bytes with
//! the base-14 Helvetica faces; [`report`] lays the ranking report out on it.

pub mod canvas;
pub mod report;

pub use canvas::{Font, PdfCanvas};
pub use report::DocumentReport;
