//! Minimal PDF text canvas.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner.
//! Pages are buffered until [`PdfCanvas::save`], which writes the whole file
//! with a cross-reference table. No timestamps or document IDs are emitted,
//! so identical drawing calls give identical bytes.


/// US Letter width in points.
pub const LETTER_WIDTH: f64 = 612.0;

/// US Letter height in points.
pub const LETTER_HEIGHT: f64 = 792.0;

/// Base-14 fonts available on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    const ALL: [Font; 2] = [Font::Helvetica, Font::HelveticaBold];

    fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }
}

/// A text-only drawing surface that accumulates pages.
#[derive(Debug, Clone)]
pub struct PdfCanvas {
    width: f64,
    height: f64,
    font: Font,
    font_size: f64,
    current: String,
    pages: Vec<String>,
}

impl PdfCanvas {
    /// Create a canvas with the given page size in points.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            font: Font::Helvetica,
            font_size: 12.0,
            current: String::new(),
            pages: Vec::new(),
        }
    }

    /// Create a US Letter canvas.
    pub fn letter() -> Self {
        Self::new(LETTER_WIDTH, LETTER_HEIGHT)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Font used by subsequent `draw_string` calls.
    pub fn set_font(&mut self, font: Font, size: f64) {
        self.font = font;
        self.font_size = size;
    }

    /// Draw a single line of text with its baseline starting at `(x, y)`.
    pub fn draw_string(&mut self, x: f64, y: f64, text: &str) {
        self.current.push_str(&format!(
            "BT /{} {} Tf {} {} Td ({}) Tj ET\n",
            self.font.resource_name(),
            fmt_number(self.font_size),
            fmt_number(x),
            fmt_number(y),
            escape_text(text)
        ));
    }

    /// Finish the current page and start a new one.
    pub fn show_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
    }

    /// Number of finished pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Write the document. A page with pending drawing is finished first;
    /// a canvas with no pages still yields one blank page.
    pub fn save(mut self) -> Vec<u8> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.show_page();
        }

        // Objects: 1 catalog, 2 page tree, then fonts, then page + content pairs.
        let font_base = 3;
        let page_base = font_base + Font::ALL.len();
        let page_ids: Vec<usize> = (0..self.pages.len()).map(|i| page_base + i * 2).collect();

        let mut objects: Vec<Vec<u8>> = Vec::new();
        objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());

        let kids = page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        objects.push(
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids,
                self.pages.len()
            )
            .into_bytes(),
        );

        for font in Font::ALL {
            objects.push(
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    font.base_font()
                )
                .into_bytes(),
            );
        }

        let font_resources = Font::ALL
            .iter()
            .enumerate()
            .map(|(i, f)| format!("/{} {} 0 R", f.resource_name(), font_base + i))
            .collect::<Vec<_>>()
            .join(" ");

        for (page_id, content) in page_ids.iter().zip(&self.pages) {
            objects.push(
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /Font << {} >> >> /Contents {} 0 R >>",
                    fmt_number(self.width),
                    fmt_number(self.height),
                    font_resources,
                    page_id + 1
                )
                .into_bytes(),
            );

            let stream = encode_win_ansi(content);
            let mut object = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
            object.extend_from_slice(&stream);
            object.extend_from_slice(b"\nendstream");
            objects.push(object);
        }

        write_document(&objects)
    }
}

/// Serialize numbered objects with header, xref table and trailer.
fn write_document(objects: &[Vec<u8>]) -> Vec<u8> {
    let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());

    for (idx, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", idx + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{:010} 00000 n \n", offset));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));
    out.extend_from_slice(xref.as_bytes());
    out
}

/// Format a coordinate without trailing zeros.
fn fmt_number(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Escape a string literal for a content stream.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// Encode content for the WinAnsi fonts. Characters outside Latin-1 become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0x0A | 0xA0..=0xFF => c as u32 as u8,
            0x2013 => 0x96,
            0x2014 => 0x97,
            _ => b'?',
        })
        .collect()
}
