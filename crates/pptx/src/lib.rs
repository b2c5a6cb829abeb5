//! PPTX (Office Open XML) backend for the slide-deck report.
//!
//! Writes .pptx packages (ZIP archives of XML parts) and reads their slide
//! text back for verification.

pub mod parts;
pub mod reader;
pub mod report;
pub mod writer;

pub use reader::{DeckParagraph, DeckReader, DeckSlide};
pub use report::SlideReport;
pub use writer::{Paragraph, PptxWriter, SlideContent, SlideLayout};
