//! `lopdf` document renderer.
//!
//! Layout is a two-step pass:
//! 1. `layout_pages` (pure): greedy word-wrap with the static metric tables, then
//!    place lines top-down, opening a new page when the next line would cross the
//!    bottom margin.
//! 2. `LopdfRenderer::render`: one content stream per laid-out page.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::render::metrics::{get_metrics, Font};
use crate::render::{DocumentRenderer, RenderError, ResumeSection};

/// US letter, in points.
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const TEXT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const TITLE_SIZE: f32 = 14.0;
const TITLE_LEADING: f32 = 20.0;
const BODY_SIZE: f32 = 11.0;
const BODY_LEADING: f32 = 14.0;
/// Vertical space between consecutive blocks.
const SECTION_GAP: f32 = 20.0;

/// A single positioned line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub font: Font,
    pub size: f32,
    pub x: f32,
    /// Baseline, measured from the bottom of the page.
    pub y: f32,
    pub text: String,
}

pub type Page = Vec<PlacedLine>;

struct Cursor {
    pages: Vec<Page>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn at_page_top(&self) -> bool {
        self.y >= PAGE_HEIGHT - MARGIN
    }

    /// Vertical gap that is dropped when it would land at the top of a page.
    fn skip(&mut self, gap: f32) {
        if !self.at_page_top() {
            self.y -= gap;
        }
    }

    fn place(&mut self, font: Font, size: f32, leading: f32, text: String) {
        if self.y - leading < MARGIN && !self.at_page_top() {
            self.pages.push(Vec::new());
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.y -= leading;
        if !text.is_empty() {
            if let Some(page) = self.pages.last_mut() {
                page.push(PlacedLine {
                    font,
                    size,
                    x: MARGIN,
                    y: self.y,
                    text,
                });
            }
        }
    }
}

/// Lays out one block per section: upper-cased title, then the wrapped body.
pub fn layout_pages(sections: &[ResumeSection]) -> Vec<Page> {
    let mut cursor = Cursor::new();

    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            cursor.skip(SECTION_GAP);
        }

        let title = sanitize(&section.name.to_uppercase());
        for line in wrap(&title, Font::HelveticaBold, TITLE_SIZE, TEXT_WIDTH) {
            cursor.place(Font::HelveticaBold, TITLE_SIZE, TITLE_LEADING, line);
        }

        let body = sanitize(&section.body);
        for paragraph in body.split('\n') {
            let lines = wrap(paragraph, Font::Helvetica, BODY_SIZE, TEXT_WIDTH);
            if lines.is_empty() {
                // Blank source line: keep the vertical space.
                cursor.place(Font::Helvetica, BODY_SIZE, BODY_LEADING, String::new());
            }
            for line in lines {
                cursor.place(Font::Helvetica, BODY_SIZE, BODY_LEADING, line);
            }
        }
    }

    cursor.pages
}

/// Greedy word-wrap. Words wider than a full line are split by character.
fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let metrics = get_metrics(font);
    let space = metrics.measure_str(" ", size);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_width = metrics.measure_str(word, size);

        if word_width > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            for c in word.chars() {
                let w = metrics.measure_str(c.encode_utf8(&mut [0; 4]), size);
                if current_width + w > max_width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(c);
                current_width += w;
            }
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Normalizes line endings and replaces anything outside Latin-1 with `?`.
fn sanitize(text: &str) -> String {
    text.replace("\r\n", "\n")
        .chars()
        .map(|c| match c {
            '\n' => '\n',
            '\t' | '\r' => ' ',
            c if c.is_control() => ' ',
            c if (c as u32) <= 0xFF => c,
            _ => '?',
        })
        .collect()
}

/// Latin-1 bytes for a sanitized line.
fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(c as u32).unwrap_or(b'?'))
        .collect()
}

fn page_operations(page: &[PlacedLine]) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(page.len() * 5);
    for line in page {
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![line.font.resource_name().into(), line.size.into()],
        ));
        ops.push(Operation::new("Td", vec![line.x.into(), line.y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_latin1(&line.text))],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
    ops
}

fn font_object(font: Font) -> Object {
    Object::Dictionary(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    })
}

/// Renders with the two core Helvetica faces on US letter, 1" margins.
pub struct LopdfRenderer;

impl DocumentRenderer for LopdfRenderer {
    fn render(&self, sections: &[ResumeSection]) -> Result<Vec<u8>, RenderError> {
        let pages = layout_pages(sections);

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(font_object(Font::Helvetica));
        let bold_id = doc.add_object(font_object(Font::HelveticaBold));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                Font::Helvetica.resource_name() => regular_id,
                Font::HelveticaBold.resource_name() => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for page in &pages {
            let content = Content {
                operations: page_operations(page),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    PAGE_WIDTH.into(),
                    PAGE_HEIGHT.into(),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf)
            .map_err(|e| RenderError(format!("Failed to write PDF: {e}")))?;
        Ok(buf)
    }
}
