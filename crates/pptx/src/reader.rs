//! Reads slide text back out of a .pptx package.

use movie_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::io::{Read, Seek};
use zip::ZipArchive;

/// A paragraph of slide text with its outline level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckParagraph {
    pub text: String,
    pub level: u8,
}

/// Text of one slide, in shape order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSlide {
    /// 1-based slide number.
    pub number: usize,
    pub paragraphs: Vec<DeckParagraph>,
}

impl DeckSlide {
    /// Paragraph texts without levels.
    pub fn texts(&self) -> Vec<&str> {
        self.paragraphs.iter().map(|p| p.text.as_str()).collect()
    }
}

/// Reader for .pptx slide text.
#[derive(Debug, Clone)]
pub struct DeckReader;

impl DeckReader {
    pub fn new() -> Self {
        Self
    }

    /// Read every slide in presentation order.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Vec<DeckSlide>> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        slide_paths(&archive)
            .iter()
            .enumerate()
            .map(|(idx, path)| {
                let content = self.read_file_from_archive(&mut archive, path)?;
                Ok(DeckSlide {
                    number: idx + 1,
                    paragraphs: extract_paragraphs(&content)?,
                })
            })
            .collect()
    }

    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for DeckReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Paragraphs inside text bodies, with `lvl` taken from `a:pPr`.
fn extract_paragraphs(xml: &str) -> Result<Vec<DeckParagraph>> {
    let mut paragraphs = Vec::new();
    let mut reader = Reader::from_str(xml);

    let mut in_text_body = false;
    let mut current: Option<DeckParagraph> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"txBody" => in_text_body = true,
                b"p" if in_text_body => {
                    current = Some(DeckParagraph {
                        text: String::new(),
                        level: 0,
                    });
                }
                b"pPr" => set_level(&mut current, e),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if local_name(e.name().as_ref()) == b"pPr" {
                    set_level(&mut current, e);
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(paragraph) = current.as_mut() {
                    let text = e
                        .unescape()
                        .map_err(|err| Error::XmlError(format!("Bad slide text: {}", err)))?;
                    paragraph.text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"txBody" => in_text_body = false,
                b"p" => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing slide: {}", e)));
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn set_level(current: &mut Option<DeckParagraph>, e: &BytesStart<'_>) {
    if let (Some(paragraph), Some(level)) = (current.as_mut(), attribute(e, b"lvl")) {
        paragraph.level = level.parse().unwrap_or(0);
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Slide parts ordered by number, `ppt/slides/slide1.xml` first.
fn slide_paths<R: Read + Seek>(archive: &ZipArchive<R>) -> Vec<String> {
    let mut slides: Vec<(usize, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = name
                .strip_prefix("ppt/slides/slide")?
                .strip_suffix(".xml")?
                .parse()
                .ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort_by_key(|(number, _)| *number);
    slides.into_iter().map(|(_, path)| path).collect()
}
