//! PPTX package writer.

use crate::parts::{self, NS_A, NS_P, NS_R, SLIDE_HEIGHT, SLIDE_WIDTH};
use movie_core::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Left indent per paragraph level, in EMU.
const LEVEL_INDENT: i64 = 457_200;

/// Which layout a slide uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideLayout {
    /// Centered title with a subtitle.
    Title,
    /// Title with a bulleted body.
    TitleAndContent,
}

impl SlideLayout {
    fn part_number(self) -> usize {
        match self {
            SlideLayout::Title => 1,
            SlideLayout::TitleAndContent => 2,
        }
    }
}

/// One body paragraph. Level 0 is the outermost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub level: u8,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: 0,
        }
    }

    pub fn nested(text: impl Into<String>, level: u8) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }
}

/// Content of a single slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideContent {
    pub layout: SlideLayout,
    pub title: String,
    /// Subtitle paragraphs for `Title`, body paragraphs otherwise.
    pub body: Vec<Paragraph>,
}

/// Placement and placeholder type of a text shape.
struct ShapeSpec<'a> {
    id: usize,
    name: &'a str,
    ph_type: Option<&'a str>,
    ph_idx: Option<&'a str>,
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
    font_size: &'a str,
}

/// Writes slide content into a .pptx package.
#[derive(Debug, Clone)]
pub struct PptxWriter;

impl PptxWriter {
    /// Create a new PPTX writer.
    pub fn new() -> Self {
        Self
    }

    /// Build the package bytes. Entry timestamps are fixed, so the same
    /// slides always produce the same bytes.
    pub fn write(&self, slides: &[SlideContent]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        let mut add = |path: &str, content: &[u8]| -> Result<()> {
            zip.start_file(path, options)
                .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", path, e)))?;
            zip.write_all(content)
                .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", path, e)))
        };

        add("[Content_Types].xml", parts::content_types(slides.len()).as_bytes())?;
        add(
            "_rels/.rels",
            parts::relationships(&[(
                "rId1".into(),
                parts::REL_OFFICE_DOCUMENT,
                "ppt/presentation.xml".into(),
            )])
            .as_bytes(),
        )?;

        add("ppt/presentation.xml", parts::presentation(slides.len()).as_bytes())?;
        let mut pres_rels = vec![(
            "rId1".to_string(),
            parts::REL_SLIDE_MASTER,
            "slideMasters/slideMaster1.xml".to_string(),
        )];
        for n in 1..=slides.len() {
            pres_rels.push((
                format!("rId{}", n + 1),
                parts::REL_SLIDE,
                format!("slides/slide{}.xml", n),
            ));
        }
        pres_rels.push((
            format!("rId{}", slides.len() + 2),
            parts::REL_THEME,
            "theme/theme1.xml".to_string(),
        ));
        add(
            "ppt/_rels/presentation.xml.rels",
            parts::relationships(&pres_rels).as_bytes(),
        )?;

        add("ppt/slideMasters/slideMaster1.xml", parts::slide_master().as_bytes())?;
        add(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            parts::relationships(&[
                ("rId1".into(), parts::REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".into()),
                ("rId2".into(), parts::REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout2.xml".into()),
                ("rId3".into(), parts::REL_THEME, "../theme/theme1.xml".into()),
            ])
            .as_bytes(),
        )?;

        for (n, (layout_type, name)) in [("title", "Title Slide"), ("obj", "Title and Content")]
            .iter()
            .enumerate()
        {
            add(
                &format!("ppt/slideLayouts/slideLayout{}.xml", n + 1),
                parts::slide_layout(layout_type, name).as_bytes(),
            )?;
            add(
                &format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", n + 1),
                parts::relationships(&[(
                    "rId1".into(),
                    parts::REL_SLIDE_MASTER,
                    "../slideMasters/slideMaster1.xml".into(),
                )])
                .as_bytes(),
            )?;
        }

        add("ppt/theme/theme1.xml", parts::theme().as_bytes())?;

        for (idx, slide) in slides.iter().enumerate() {
            let n = idx + 1;
            add(&format!("ppt/slides/slide{}.xml", n), &slide_xml(slide)?)?;
            add(
                &format!("ppt/slides/_rels/slide{}.xml.rels", n),
                parts::relationships(&[(
                    "rId1".into(),
                    parts::REL_SLIDE_LAYOUT,
                    format!("../slideLayouts/slideLayout{}.xml", slide.layout.part_number()),
                )])
                .as_bytes(),
            )?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;

        log::debug!("Wrote PPTX package with {} slides", slides.len());

        Ok(cursor.into_inner())
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize one slide's shape tree.
fn slide_xml(slide: &SlideContent) -> Result<Vec<u8>> {
    let mut xml = XmlOut::new();
    xml.decl()?;
    xml.open("p:sld", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
    xml.open("p:cSld", &[])?;
    xml.open("p:spTree", &[])?;
    xml.raw(parts::GROUP_HEADER)?;

    let margin = SLIDE_WIDTH / 16;
    let inner_width = SLIDE_WIDTH - 2 * margin;

    let (title, body) = match slide.layout {
        SlideLayout::Title => (
            ShapeSpec {
                id: 2,
                name: "Title 1",
                ph_type: Some("ctrTitle"),
                ph_idx: None,
                x: margin,
                y: SLIDE_HEIGHT * 2 / 7,
                cx: inner_width,
                cy: SLIDE_HEIGHT / 5,
                font_size: "4400",
            },
            ShapeSpec {
                id: 3,
                name: "Subtitle 2",
                ph_type: Some("subTitle"),
                ph_idx: Some("1"),
                x: margin * 2,
                y: SLIDE_HEIGHT * 4 / 7,
                cx: SLIDE_WIDTH - 4 * margin,
                cy: SLIDE_HEIGHT / 5,
                font_size: "2400",
            },
        ),
        SlideLayout::TitleAndContent => (
            ShapeSpec {
                id: 2,
                name: "Title 1",
                ph_type: Some("title"),
                ph_idx: None,
                x: margin,
                y: SLIDE_HEIGHT / 25,
                cx: inner_width,
                cy: SLIDE_HEIGHT / 6,
                font_size: "3600",
            },
            ShapeSpec {
                id: 3,
                name: "Content Placeholder 2",
                ph_type: None,
                ph_idx: Some("1"),
                x: margin,
                y: SLIDE_HEIGHT / 4,
                cx: inner_width,
                cy: SLIDE_HEIGHT * 2 / 3,
                font_size: "2400",
            },
        ),
    };

    write_shape(&mut xml, &title, &[Paragraph::new(slide.title.clone())])?;
    write_shape(&mut xml, &body, &slide.body)?;

    xml.close("p:spTree")?;
    xml.close("p:cSld")?;
    xml.open("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.close("p:clrMapOvr")?;
    xml.close("p:sld")?;
    Ok(xml.finish())
}

fn write_shape(xml: &mut XmlOut, spec: &ShapeSpec<'_>, paragraphs: &[Paragraph]) -> Result<()> {
    let id = spec.id.to_string();
    xml.open("p:sp", &[])?;

    xml.open("p:nvSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", id.as_str()), ("name", spec.name)])?;
    xml.open("p:cNvSpPr", &[])?;
    xml.empty("a:spLocks", &[("noGrp", "1")])?;
    xml.close("p:cNvSpPr")?;
    xml.open("p:nvPr", &[])?;
    let mut ph: Vec<(&str, &str)> = Vec::new();
    if let Some(t) = spec.ph_type {
        ph.push(("type", t));
    }
    if let Some(idx) = spec.ph_idx {
        ph.push(("idx", idx));
    }
    xml.empty("p:ph", &ph)?;
    xml.close("p:nvPr")?;
    xml.close("p:nvSpPr")?;

    let (x, y, cx, cy) = (
        spec.x.to_string(),
        spec.y.to_string(),
        spec.cx.to_string(),
        spec.cy.to_string(),
    );
    xml.open("p:spPr", &[])?;
    xml.open("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    xml.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.close("a:xfrm")?;
    xml.close("p:spPr")?;

    xml.open("p:txBody", &[])?;
    xml.empty("a:bodyPr", &[("wrap", "square")])?;
    xml.empty("a:lstStyle", &[])?;
    if paragraphs.is_empty() {
        xml.empty("a:p", &[])?;
    }
    for paragraph in paragraphs {
        xml.open("a:p", &[])?;
        if paragraph.level > 0 {
            let level = paragraph.level.to_string();
            let margin = (LEVEL_INDENT * i64::from(paragraph.level)).to_string();
            xml.empty("a:pPr", &[("lvl", level.as_str()), ("marL", margin.as_str())])?;
        }
        xml.open("a:r", &[])?;
        xml.empty("a:rPr", &[("lang", "en-US"), ("sz", spec.font_size)])?;
        xml.open("a:t", &[])?;
        xml.text(&paragraph.text)?;
        xml.close("a:t")?;
        xml.close("a:r")?;
        xml.close("a:p")?;
    }
    xml.close("p:txBody")?;

    xml.close("p:sp")?;
    Ok(())
}

/// Thin wrapper over the quick-xml writer mapping errors into ours.
struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::XmlError(format!("Failed to write slide XML: {}", e)))
    }

    fn decl(&mut self) -> Result<()> {
        self.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.emit(Event::Start(
            BytesStart::new(name).with_attributes(attrs.iter().copied()),
        ))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.emit(Event::Empty(
            BytesStart::new(name).with_attributes(attrs.iter().copied()),
        ))
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.emit(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.emit(Event::Text(BytesText::new(text)))
    }

    /// Append pre-built markup verbatim.
    fn raw(&mut self, markup: &str) -> Result<()> {
        self.writer
            .get_mut()
            .write_all(markup.as_bytes())
            .map_err(|e| Error::XmlError(format!("Failed to write slide XML: {}", e)))
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck() -> Vec<SlideContent> {
        vec![
            SlideContent {
                layout: SlideLayout::Title,
                title: "Hello".into(),
                body: vec![Paragraph::new("Sub")],
            },
            SlideContent {
                layout: SlideLayout::TitleAndContent,
                title: "Body & <Stuff>".into(),
                body: vec![Paragraph::new("Top"), Paragraph::nested("Inner", 1)],
            },
        ]
    }

    #[test]
    fn test_slide_xml_escapes_text() {
        let xml = String::from_utf8(slide_xml(&deck()[1]).unwrap()).unwrap();
        assert!(xml.contains("<a:t>Body &amp; &lt;Stuff&gt;</a:t>"));
        assert!(xml.contains(r#"<a:pPr lvl="1" marL="457200"/>"#));
        assert!(xml.contains(r#"<p:ph idx="1"/>"#));
        assert!(xml.starts_with("<?xml"));
    }

    #[test]
    fn test_empty_body_still_has_paragraph() {
        let slide = SlideContent {
            layout: SlideLayout::TitleAndContent,
            title: "Only title".into(),
            body: Vec::new(),
        };
        let xml = String::from_utf8(slide_xml(&slide).unwrap()).unwrap();
        assert!(xml.contains("<a:p/>"));
    }

    #[test]
    fn test_package_contains_required_parts() {
        let bytes = PptxWriter::new().write(&deck()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout2.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing part {}", name);
        }
        assert!(archive.by_name("ppt/slides/slide3.xml").is_err());
    }

    #[test]
    fn test_write_is_deterministic() {
        let writer = PptxWriter::new();
        assert_eq!(writer.write(&deck()).unwrap(), writer.write(&deck()).unwrap());
    }
}
