//! Three-slide analytics report.

use crate::writer::{Paragraph, PptxWriter, SlideContent, SlideLayout};
use movie_core::{Artifact, ArtifactFormat, DatasetSummary, RankedSummary, Result};

const TITLE: &str = "Movie Analytics Report";
const SUBTITLE: &str = "Auto-generated from the movie ratings dashboard";
const SUMMARY_TITLE: &str = "Dataset Summary";
const RANKINGS_TITLE: &str = "Top 3 Highest & Lowest (Critic Rating)";

/// Renders the dataset summary and rankings as a slide deck.
///
/// Slides, in order: title, dataset summary, rankings. Genre and year lines
/// are left out when the filtered dataset has no such column.
#[derive(Debug, Default)]
pub struct SlideReport {
    writer: PptxWriter,
}

impl SlideReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slide contents without packaging.
    pub fn slides(
        &self,
        summary: &DatasetSummary,
        highest: &RankedSummary,
        lowest: &RankedSummary,
    ) -> Vec<SlideContent> {
        let title = SlideContent {
            layout: SlideLayout::Title,
            title: TITLE.to_string(),
            body: vec![Paragraph::new(SUBTITLE)],
        };

        let mut summary_body = vec![Paragraph::new(format!(
            "Total filtered movies: {}",
            summary.row_count
        ))];
        summary_body.extend(summary.genres_line().map(|l| Paragraph::nested(l, 1)));
        summary_body.extend(summary.years_line().map(|l| Paragraph::nested(l, 1)));

        let mut rankings_body = vec![Paragraph::new("Top 3 Highest:")];
        rankings_body.extend(highest.entries.iter().map(|e| Paragraph::nested(e.label(), 1)));
        rankings_body.push(Paragraph::new("Top 3 Lowest:"));
        rankings_body.extend(lowest.entries.iter().map(|e| Paragraph::nested(e.label(), 1)));

        vec![
            title,
            SlideContent {
                layout: SlideLayout::TitleAndContent,
                title: SUMMARY_TITLE.to_string(),
                body: summary_body,
            },
            SlideContent {
                layout: SlideLayout::TitleAndContent,
                title: RANKINGS_TITLE.to_string(),
                body: rankings_body,
            },
        ]
    }

    /// Render the finished .pptx artifact.
    pub fn render(
        &self,
        summary: &DatasetSummary,
        highest: &RankedSummary,
        lowest: &RankedSummary,
    ) -> Result<Artifact> {
        let slides = self.slides(summary, highest, lowest);
        let bytes = self.writer.write(&slides)?;
        Ok(Artifact::new(ArtifactFormat::Pptx, bytes))
    }
}
