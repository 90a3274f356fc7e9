//! Hierarchical paragraph/line/word XML export.
//!
//! Document layout:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <metadata>
//! <image>kh_data_1.png</image>
//! <width>2480</width>
//! <height>3508</height>
//! <paragraph id="1">
//! <line id="1">
//! <word>
//! <text>...</text>
//! <bbox x1=".." y1=".." x2=".." y2=".."/>
//! </word>
//! </line>
//! </paragraph>
//! </metadata>
//! ```
//!
//! Paragraphs and lines are emitted in ascending id order regardless of the order
//! of the input words; words keep their input order within a line. Boxes are the
//! pixel rectangles rounded down to integers. A paragraph id of 0 or less means
//! "no explicit paragraph" and is written without an `id` attribute.

use std::collections::BTreeMap;

use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};
use crate::layout::PlacedWord;

/// A word leaf: text plus integer `[x1, y1, x2, y2]` box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordNode {
    /// Word text
    pub text: String,
    /// Pixel box rounded down
    pub bbox: [i64; 4],
}

/// A line with its words in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineNode {
    /// 1-based line id
    pub id: u32,
    /// Words on the line
    pub words: Vec<WordNode>,
}

/// A paragraph with its lines in ascending id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphNode {
    /// Paragraph id; values <= 0 are written without an id attribute
    pub id: i32,
    /// Lines in the paragraph
    pub lines: Vec<LineNode>,
}

/// Root of a hierarchical annotation file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotationDocument {
    /// Image file name
    pub image: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Paragraphs in ascending id order
    pub paragraphs: Vec<ParagraphNode>,
}

/// Group placed words into the paragraph → line → word tree.
pub fn build_document(
    placed: &[PlacedWord],
    image_name: &str,
    page_width: u32,
    page_height: u32,
) -> AnnotationDocument {
    let mut grouped: BTreeMap<i32, BTreeMap<u32, Vec<WordNode>>> = BTreeMap::new();
    for word in placed {
        grouped
            .entry(word.paragraph_id)
            .or_default()
            .entry(word.line_id)
            .or_default()
            .push(WordNode {
                text: word.text.clone(),
                bbox: word.rect.floor_corners(),
            });
    }

    let paragraphs = grouped
        .into_iter()
        .map(|(id, lines)| ParagraphNode {
            id,
            lines: lines
                .into_iter()
                .map(|(id, words)| LineNode { id, words })
                .collect(),
        })
        .collect();

    AnnotationDocument {
        image: image_name.to_string(),
        width: page_width,
        height: page_height,
        paragraphs,
    }
}

impl AnnotationDocument {
    /// All words in document order.
    pub fn words(&self) -> impl Iterator<Item = &WordNode> {
        self.paragraphs
            .iter()
            .flat_map(|p| p.lines.iter())
            .flat_map(|l| l.words.iter())
    }

    /// Number of words in the document.
    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    /// Serialize with one element per line and no indentation.
    pub fn to_xml(&self) -> Result<String> {
        self.to_xml_with_indent(0)
    }

    /// Serialize with one element per line, nested elements indented by `indent` spaces.
    pub fn to_xml_with_indent(&self, indent: usize) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', indent);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        writer.create_element("metadata").write_inner_content(|w| {
            w.create_element("image")
                .write_text_content(BytesText::new(&self.image))?;
            w.create_element("width")
                .write_text_content(BytesText::new(&self.width.to_string()))?;
            w.create_element("height")
                .write_text_content(BytesText::new(&self.height.to_string()))?;

            for paragraph in &self.paragraphs {
                let paragraph_id = paragraph.id.to_string();
                let mut element = w.create_element("paragraph");
                if paragraph.id > 0 {
                    element = element.with_attribute(("id", paragraph_id.as_str()));
                }
                element.write_inner_content(|w| write_lines(w, &paragraph.lines))?;
            }
            Ok::<(), quick_xml::Error>(())
        })?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| Error::InvalidAnnotation(format!("non UTF-8 output: {}", e)))
    }

    /// Parse a document produced by [`to_xml`](Self::to_xml).
    ///
    /// Paragraphs without an `id` attribute get id 0.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut doc = AnnotationDocument::default();
        let mut element_stack: Vec<String> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match name.as_str() {
                        "paragraph" => {
                            let id = parse_id_attribute(&e)?.unwrap_or(0);
                            doc.paragraphs.push(ParagraphNode {
                                id: id as i32,
                                lines: Vec::new(),
                            });
                        },
                        "line" => {
                            let id = parse_id_attribute(&e)?.ok_or_else(|| {
                                Error::InvalidAnnotation("line without id".to_string())
                            })?;
                            current_paragraph(&mut doc)?.lines.push(LineNode {
                                id: id as u32,
                                words: Vec::new(),
                            });
                        },
                        "word" => {
                            current_line(&mut doc)?.words.push(WordNode {
                                text: String::new(),
                                bbox: [0; 4],
                            });
                        },
                        _ => {},
                    }
                    element_stack.push(name);
                },
                Event::Empty(e) => {
                    if e.name().as_ref() == b"bbox" {
                        let bbox = parse_bbox(&e)?;
                        current_word(&mut doc)?.bbox = bbox;
                    } else if e.name().as_ref() == b"paragraph" {
                        let id = parse_id_attribute(&e)?.unwrap_or(0);
                        doc.paragraphs.push(ParagraphNode {
                            id: id as i32,
                            lines: Vec::new(),
                        });
                    }
                },
                Event::Text(e) => {
                    let text = e.unescape()?.to_string();
                    match element_stack.last().map(String::as_str) {
                        Some("image") => doc.image = text,
                        Some("width") => doc.width = parse_number(&text, "width")? as u32,
                        Some("height") => doc.height = parse_number(&text, "height")? as u32,
                        Some("text") => current_word(&mut doc)?.text = text,
                        _ => {},
                    }
                },
                Event::End(_) => {
                    element_stack.pop();
                },
                Event::Eof => break,
                _ => {},
            }
        }

        Ok(doc)
    }
}

fn write_lines(w: &mut Writer<Vec<u8>>, lines: &[LineNode]) -> quick_xml::Result<()> {
    for line in lines {
        let line_id = line.id.to_string();
        w.create_element("line")
            .with_attribute(("id", line_id.as_str()))
            .write_inner_content(|w| {
                for word in &line.words {
                    w.create_element("word").write_inner_content(|w| {
                        w.create_element("text")
                            .write_text_content(BytesText::new(&word.text))?;
                        let [x1, y1, x2, y2] = word.bbox.map(|v| v.to_string());
                        w.create_element("bbox")
                            .with_attribute(("x1", x1.as_str()))
                            .with_attribute(("y1", y1.as_str()))
                            .with_attribute(("x2", x2.as_str()))
                            .with_attribute(("y2", y2.as_str()))
                            .write_empty()?;
                        Ok::<(), quick_xml::Error>(())
                    })?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;
    }
    Ok(())
}

fn parse_number(value: &str, what: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|e| Error::InvalidAnnotation(format!("{} '{}': {}", what, value, e)))
}

fn parse_id_attribute(e: &quick_xml::events::BytesStart) -> Result<Option<i64>> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == b"id" {
            let value = attr.unescape_value()?;
            return parse_number(&value, "id").map(Some);
        }
    }
    Ok(None)
}

fn parse_bbox(e: &quick_xml::events::BytesStart) -> Result<[i64; 4]> {
    let mut bbox = [None; 4];
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let slot = match attr.key.as_ref() {
            b"x1" => 0,
            b"y1" => 1,
            b"x2" => 2,
            b"y2" => 3,
            _ => continue,
        };
        let value = attr.unescape_value()?;
        bbox[slot] = Some(parse_number(&value, "bbox")?);
    }

    match bbox {
        [Some(x1), Some(y1), Some(x2), Some(y2)] => Ok([x1, y1, x2, y2]),
        _ => Err(Error::InvalidAnnotation(
            "bbox needs x1, y1, x2 and y2".to_string(),
        )),
    }
}

fn current_paragraph(doc: &mut AnnotationDocument) -> Result<&mut ParagraphNode> {
    doc.paragraphs
        .last_mut()
        .ok_or_else(|| Error::InvalidAnnotation("line outside paragraph".to_string()))
}

fn current_line(doc: &mut AnnotationDocument) -> Result<&mut LineNode> {
    current_paragraph(doc)?
        .lines
        .last_mut()
        .ok_or_else(|| Error::InvalidAnnotation("word outside line".to_string()))
}

fn current_word(doc: &mut AnnotationDocument) -> Result<&mut WordNode> {
    current_line(doc)?
        .words
        .last_mut()
        .ok_or_else(|| Error::InvalidAnnotation("text or bbox outside word".to_string()))
}
