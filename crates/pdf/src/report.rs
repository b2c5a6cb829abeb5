//! Ranking report layout.
//!
//! A title line, then "highest" and "lowest" sections with one film per line,
//! laid out with a top-down cursor. When the cursor would drop below the
//! bottom margin the report continues on a new page.

use crate::canvas::{Font, PdfCanvas};
use movie_core::{Artifact, ArtifactFormat, RankedSummary};

const TITLE: &str = "Movie Analytics Report";
const HIGHEST_HEADER: &str = "Top 3 Highest Rated Movies (Critic):";
const LOWEST_HEADER: &str = "Top 3 Lowest Rated Movies (Critic):";

const HEADER_X: f64 = 30.0;
const ENTRY_X: f64 = 40.0;
const LINE_STEP: f64 = 15.0;
const BOTTOM_MARGIN: f64 = 36.0;

/// Renders highest/lowest summaries into a PDF document.
#[derive(Debug, Clone, Default)]
pub struct DocumentReport;

impl DocumentReport {
    pub fn new() -> Self {
        Self
    }

    /// Render the report. Film names only; the ratings are not printed.
    pub fn render(&self, highest: &RankedSummary, lowest: &RankedSummary) -> Artifact {
        let mut layout = Layout::new(PdfCanvas::letter());

        layout.canvas.set_font(Font::HelveticaBold, 16.0);
        layout.line_at(HEADER_X, 30.0, TITLE);

        layout.canvas.set_font(Font::Helvetica, 12.0);
        layout.line_at(HEADER_X, 60.0, HIGHEST_HEADER);
        layout.cursor = layout.top() - 80.0;
        for film in highest.films() {
            layout.entry(film);
        }

        layout.ensure_room(10.0);
        let y = layout.cursor - 10.0;
        layout.canvas.draw_string(HEADER_X, y, LOWEST_HEADER);
        layout.cursor -= 30.0;
        for film in lowest.films() {
            layout.entry(film);
        }

        let pages = layout.canvas.page_count() + 1;
        log::debug!(
            "Rendered document report with {} + {} entries on {} page(s)",
            highest.len(),
            lowest.len(),
            pages
        );

        Artifact::new(ArtifactFormat::Pdf, layout.canvas.save())
    }
}

/// Canvas plus the vertical cursor of the current page.
struct Layout {
    canvas: PdfCanvas,
    cursor: f64,
}

impl Layout {
    fn new(canvas: PdfCanvas) -> Self {
        let cursor = canvas.height();
        Self { canvas, cursor }
    }

    fn top(&self) -> f64 {
        self.canvas.height()
    }

    /// Draw at a fixed offset below the top of the first page.
    fn line_at(&mut self, x: f64, offset: f64, text: &str) {
        let y = self.top() - offset;
        self.canvas.draw_string(x, y, text);
    }

    /// Draw an entry at the cursor and advance it one line.
    fn entry(&mut self, text: &str) {
        self.ensure_room(0.0);
        self.canvas.draw_string(ENTRY_X, self.cursor, text);
        self.cursor -= LINE_STEP;
    }

    /// Start a new page if drawing `below` points under the cursor would
    /// cross the bottom margin.
    fn ensure_room(&mut self, below: f64) {
        if self.cursor - below < BOTTOM_MARGIN {
            self.canvas.show_page();
            self.cursor = self.top() - 30.0 + below;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movie_core::{RankedEntry, Value};

    fn summary(films: &[&str]) -> RankedSummary {
        RankedSummary {
            entries: films
                .iter()
                .enumerate()
                .map(|(i, f)| RankedEntry {
                    film: f.to_string(),
                    value: Value::Integer(90 - i as i64),
                })
                .collect(),
        }
    }

    fn text_of(artifact: &Artifact) -> String {
        String::from_utf8_lossy(artifact.bytes()).into_owned()
    }

    #[test]
    fn test_single_page_layout() {
        let artifact = DocumentReport::new().render(
            &summary(&["Up", "Toy Story", "WALL-E"]),
            &summary(&["Catwoman", "Gigli", "Cats"]),
        );
        let text = text_of(&artifact);

        assert_eq!(artifact.format(), ArtifactFormat::Pdf);
        assert!(text.contains("/Count 1"));
        assert!(text.contains("BT /F2 16 Tf 30 762 Td (Movie Analytics Report) Tj ET"));
        assert!(text.contains("30 732 Td (Top 3 Highest Rated Movies \\(Critic\\):) Tj"));
        assert!(text.contains("40 712 Td (Up) Tj"));
        assert!(text.contains("40 697 Td (Toy Story) Tj"));
        assert!(text.contains("40 682 Td (WALL-E) Tj"));
        // Cursor is at 667 after three entries.
        assert!(text.contains("30 657 Td (Top 3 Lowest Rated Movies \\(Critic\\):) Tj"));
        assert!(text.contains("40 637 Td (Catwoman) Tj"));
        assert!(text.contains("40 607 Td (Cats) Tj"));
    }

    #[test]
    fn test_empty_summaries_still_render_headers() {
        let artifact = DocumentReport::new().render(&RankedSummary::default(), &RankedSummary::default());
        let text = text_of(&artifact);
        assert!(text.contains("(Top 3 Highest Rated Movies \\(Critic\\):)"));
        assert!(text.contains("30 702 Td (Top 3 Lowest"));
    }

    #[test]
    fn test_overflow_paginates() {
        let many: Vec<String> = (0..80).map(|i| format!("Film {}", i)).collect();
        let names: Vec<&str> = many.iter().map(String::as_str).collect();
        let artifact = DocumentReport::new().render(&summary(&names), &summary(&["Last"]));
        let text = text_of(&artifact);

        assert!(text.contains("/Count 2"));
        assert!(text.contains("(Film 79) Tj"));
        assert!(text.contains("(Last) Tj"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let report = DocumentReport::new();
        let a = report.render(&summary(&["Up"]), &summary(&["Cats"]));
        let b = report.render(&summary(&["Up"]), &summary(&["Cats"]));
        assert_eq!(a, b);
    }
}
