//! Paginated checklist documents.
//!
//! Layout is computed up front as pages of [`DrawOp`]s in PDF points
//! (origin bottom-left) and only then replayed onto a PDF, so the
//! pagination rules can be checked without parsing PDF output.

use anyhow::Context;
use bytes::Bytes;
use printpdf::path::PaintMode;
use printpdf::{BuiltinFont, Mm, PdfDocument, Rect};

pub const INCH: f32 = 72.0;
pub const PAGE_WIDTH: f32 = 8.5 * INCH;
pub const PAGE_HEIGHT: f32 = 11.0 * INCH;

const FIRST_HEADING_Y: f32 = 10.0 * INCH;
const PAGE_TOP_Y: f32 = 10.5 * INCH;
const BOTTOM_MARGIN: f32 = 1.0 * INCH;
const SECTION_MIN_SPACE: f32 = 2.0 * INCH;
const HEADING_X: f32 = 1.0 * INCH;
const HEADING_ADVANCE: f32 = 0.5 * INCH;
const BOX_X: f32 = 0.5 * INCH;
const BOX_SIZE: f32 = 0.15 * INCH;
const BOX_DROP: f32 = 0.05 * INCH;
const TEXT_X: f32 = 0.8 * INCH;
const LINE_ADVANCE: f32 = 0.3 * INCH;
const SECTION_GAP: f32 = 0.3 * INCH;

pub const HEADING_SIZE: f32 = 16.0;
pub const TEXT_SIZE: f32 = 12.0;

pub const CHECK_HEADING: &str = "Check Item Stock";

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Heading { text: String, x: f32, y: f32 },
    /// Square outline with its lower-left corner at (x, y).
    Checkbox { x: f32, y: f32, size: f32 },
    Text { text: String, x: f32, y: f32 },
}

pub type Page = Vec<DrawOp>;

/// Turns a week's lists into printable document bytes.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, title: &str, check: &[String], buy: &[String]) -> anyhow::Result<Bytes>;
}

struct Cursor {
    done: Vec<Page>,
    page: Page,
    y: f32,
}

impl Cursor {
    fn break_page(&mut self) {
        self.done.push(std::mem::take(&mut self.page));
        self.y = PAGE_TOP_Y;
    }

    fn heading(&mut self, text: String) {
        self.page.push(DrawOp::Heading {
            text,
            x: HEADING_X,
            y: self.y,
        });
        self.y -= HEADING_ADVANCE;
    }

    fn items(&mut self, items: &[String]) {
        for item in items {
            if self.y < BOTTOM_MARGIN {
                self.break_page();
            }
            self.page.push(DrawOp::Checkbox {
                x: BOX_X,
                y: self.y - BOX_DROP,
                size: BOX_SIZE,
            });
            self.page.push(DrawOp::Text {
                text: item.clone(),
                x: TEXT_X,
                y: self.y,
            });
            self.y -= LINE_ADVANCE;
        }
    }

    fn finish(mut self) -> Vec<Page> {
        self.done.push(self.page);
        self.done
    }
}

/// Buy list first under "Shopping List - <week>", then "Check Item Stock".
/// Empty sections are left out; the result always has at least one page.
pub fn layout(week: &str, check: &[String], buy: &[String]) -> Vec<Page> {
    let mut cur = Cursor {
        done: Vec::new(),
        page: Vec::new(),
        y: FIRST_HEADING_Y,
    };

    if !buy.is_empty() {
        cur.heading(format!("Shopping List - {week}"));
        cur.items(buy);
        cur.y -= SECTION_GAP;
    }

    if !check.is_empty() {
        if cur.y < SECTION_MIN_SPACE {
            cur.break_page();
        }
        cur.heading(CHECK_HEADING.to_string());
        cur.items(check);
    }

    cur.finish()
}

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / INCH)
}

/// US-letter PDF with built-in Helvetica.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfDocumentRenderer;

impl DocumentRenderer for PdfDocumentRenderer {
    fn render(&self, title: &str, check: &[String], buy: &[String]) -> anyhow::Result<Bytes> {
        let pages = layout(title, check, buy);

        let (doc, first_page, first_layer) = PdfDocument::new(
            format!("Shopping List - Week {title}"),
            mm(PAGE_WIDTH),
            mm(PAGE_HEIGHT),
            "Layer 1".to_string(),
        );
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| anyhow::anyhow!("load Helvetica-Bold: {e:?}"))?;
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow::anyhow!("load Helvetica: {e:?}"))?;

        for (i, ops) in pages.iter().enumerate() {
            let (page, layer) = if i == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1")
            };
            let layer = doc.get_page(page).get_layer(layer);

            for op in ops {
                match op {
                    DrawOp::Heading { text, x, y } => {
                        layer.use_text(text.as_str(), HEADING_SIZE, mm(*x), mm(*y), &bold);
                    }
                    DrawOp::Text { text, x, y } => {
                        layer.use_text(text.as_str(), TEXT_SIZE, mm(*x), mm(*y), &regular);
                    }
                    DrawOp::Checkbox { x, y, size } => {
                        let rect = Rect::new(mm(*x), mm(*y), mm(x + size), mm(y + size))
                            .with_mode(PaintMode::Stroke);
                        layer.add_rect(rect);
                    }
                }
            }
        }

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| anyhow::anyhow!("{e:?}"))
            .context("serialize shopping list pdf")?;
        Ok(Bytes::from(bytes))
    }
}
