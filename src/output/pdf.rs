//! Paginated PDF report layout
//!
//! This module lays a check result out on A4 pages (units are millimetres,
//! origin top-left) and produces a `PdfDocument` page model. Serialization to
//! PDF bytes lives in `pdf_writer`.
//!
//! Only the built-in Helvetica fonts are used, so every string is sanitized to
//! plain ASCII before layout.

use crate::model::{CheckResult, ScoreBand};
use chrono::{DateTime, Utc};

/// A4 width (mm)
pub const PAGE_WIDTH: f32 = 210.0;

/// A4 height (mm)
pub const PAGE_HEIGHT: f32 = 297.0;

const MARGIN_LEFT: f32 = 20.0;
const MARGIN_TOP: f32 = 20.0;
const RULE_RIGHT: f32 = 190.0;

/// No check block may extend below this line
pub const CONTENT_BOTTOM: f32 = 280.0;

/// Baseline of the page footer
pub const FOOTER_Y: f32 = 290.0;

/// Wrap width of check details
pub const DETAIL_WIDTH: f32 = 165.0;

/// Maximum detail lines rendered per check
pub const MAX_DETAIL_LINES: usize = 3;

/// Fixed label printed in every footer
pub const FOOTER_LABEL: &str = "Web Compliance Checker";

pub const REPORT_TITLE: &str = "Compliance Check Results";

const NAME_HEIGHT: f32 = 6.0;
const DETAIL_LINE_HEIGHT: f32 = 4.0;
const BLOCK_GAP: f32 = 6.0;
const DETAIL_FONT_SIZE: f32 = 9.0;

/// An RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const PASS: Color = Color(34, 197, 94);
    pub const WARNING: Color = Color(234, 179, 8);
    pub const FAIL: Color = Color(239, 68, 68);

    pub const fn gray(level: u8) -> Color {
        Color(level, level, level)
    }

    pub fn for_band(band: ScoreBand) -> Color {
        match band {
            ScoreBand::Pass => Self::PASS,
            ScoreBand::Warning => Self::WARNING,
            ScoreBand::Fail => Self::FAIL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One drawing operation on a page
#[derive(Debug, Clone, PartialEq)]
pub enum PdfElement {
    Text {
        x: f32,
        y: f32,
        text: String,
        font: Font,
        size: f32,
        color: Color,
        align: Align,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Color,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdfPage {
    pub elements: Vec<PdfElement>,
}

impl PdfPage {
    /// All text drawn on the page, in drawing order
    pub fn texts(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                PdfElement::Text { text, .. } => Some(text.as_str()),
                PdfElement::Line { .. } => None,
            })
            .collect()
    }

    /// Color of the first text element equal to `needle`
    pub fn color_of(&self, needle: &str) -> Option<Color> {
        self.elements.iter().find_map(|e| match e {
            PdfElement::Text { text, color, .. } if text == needle => Some(*color),
            _ => None,
        })
    }
}

/// A laid-out, paginated report
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdfDocument {
    pub pages: Vec<PdfPage>,
}

impl PdfDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Builds a status tag, a check name and the truncated details for one check
struct CheckBlock {
    passed: bool,
    name: String,
    detail_lines: Vec<String>,
}

impl CheckBlock {
    fn height(&self) -> f32 {
        if self.detail_lines.is_empty() {
            NAME_HEIGHT + BLOCK_GAP
        } else {
            NAME_HEIGHT + self.detail_lines.len() as f32 * DETAIL_LINE_HEIGHT + BLOCK_GAP
        }
    }
}

/// Lays out `result` as a paginated report generated now
pub fn to_pdf_document(result: &CheckResult) -> PdfDocument {
    to_pdf_document_at(result, Utc::now())
}

/// Lays out `result` as a paginated report with an explicit generation time
pub fn to_pdf_document_at(result: &CheckResult, generated_at: DateTime<Utc>) -> PdfDocument {
    let mut pages = vec![PdfPage::default()];
    let page = &mut pages[0];

    text(page, MARGIN_LEFT, 20.0, REPORT_TITLE, Font::HelveticaBold, 20.0, Color::BLACK);
    text(
        page,
        MARGIN_LEFT,
        28.0,
        &format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        Font::Helvetica,
        10.0,
        Color::gray(100),
    );
    text(
        page,
        MARGIN_LEFT,
        40.0,
        &format!("URL: {}", sanitize_text(&result.url)),
        Font::Helvetica,
        12.0,
        Color::BLACK,
    );
    text(
        page,
        MARGIN_LEFT,
        55.0,
        &format!("Score: {}%", result.score_label()),
        Font::HelveticaBold,
        16.0,
        Color::for_band(result.score_band()),
    );
    text(
        page,
        MARGIN_LEFT,
        65.0,
        &format!(
            "Passed: {} / {} checks",
            result.passed_count, result.total_count
        ),
        Font::Helvetica,
        11.0,
        Color::BLACK,
    );
    page.elements.push(PdfElement::Line {
        from: (MARGIN_LEFT, 72.0),
        to: (RULE_RIGHT, 72.0),
        color: Color::gray(200),
    });
    text(page, MARGIN_LEFT, 82.0, "Compliance Checks:", Font::HelveticaBold, 14.0, Color::BLACK);

    let mut y = 94.0;

    for check in &result.checks {
        let mut detail_lines = wrap_text(&sanitize_text(&check.details), DETAIL_FONT_SIZE, DETAIL_WIDTH);
        detail_lines.truncate(MAX_DETAIL_LINES);

        let block = CheckBlock {
            passed: check.passed,
            name: sanitize_text(&check.name),
            detail_lines,
        };

        if y + block.height() > CONTENT_BOTTOM && y > MARGIN_TOP {
            pages.push(PdfPage::default());
            y = MARGIN_TOP;
        }

        if let Some(page) = pages.last_mut() {
            y = draw_block(page, &block, y);
        }
    }

    let total = pages.len();
    for (index, page) in pages.iter_mut().enumerate() {
        page.elements.push(PdfElement::Text {
            x: PAGE_WIDTH / 2.0,
            y: FOOTER_Y,
            text: format!("Page {} of {}", index + 1, total),
            font: Font::Helvetica,
            size: 8.0,
            color: Color::gray(150),
            align: Align::Center,
        });
        text(page, MARGIN_LEFT, FOOTER_Y, FOOTER_LABEL, Font::Helvetica, 8.0, Color::gray(150));
    }

    PdfDocument { pages }
}

/// Draws one check block at `y` and returns the y of the next block
fn draw_block(page: &mut PdfPage, block: &CheckBlock, y: f32) -> f32 {
    let (tag, tag_color) = if block.passed {
        ("[PASS]", Color::PASS)
    } else {
        ("[FAIL]", Color::FAIL)
    };

    text(page, MARGIN_LEFT, y, tag, Font::HelveticaBold, 11.0, tag_color);
    text(page, 45.0, y, &block.name, Font::HelveticaBold, 11.0, Color::BLACK);

    let details_top = y + NAME_HEIGHT;
    for (i, line) in block.detail_lines.iter().enumerate() {
        text(
            page,
            25.0,
            details_top + i as f32 * DETAIL_LINE_HEIGHT,
            line,
            Font::Helvetica,
            DETAIL_FONT_SIZE,
            Color::gray(80),
        );
    }

    y + block.height()
}

fn text(page: &mut PdfPage, x: f32, y: f32, content: &str, font: Font, size: f32, color: Color) {
    page.elements.push(PdfElement::Text {
        x,
        y,
        text: content.to_string(),
        font,
        size,
        color,
        align: Align::Left,
    });
}

/// Normalizes typographic punctuation to ASCII and drops any other non-ASCII character
///
/// # Example
///
/// ```
/// use compliance_checker::output::sanitize_text;
///
/// assert_eq!(sanitize_text("\u{201C}Caf\u{e9}\u{201D} \u{2014} ok\u{2026}"), "\"Caf\" -- ok...");
/// ```
pub fn sanitize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for c in input.chars() {
        match c {
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' => out.push('-'),
            '\u{2014}' => out.push_str("--"),
            '\u{2026}' => out.push_str("..."),
            c if c.is_ascii() => out.push(c),
            _ => {}
        }
    }

    out
}

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, // A-Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333,
    500, 278, 556, 500, 722, 500, 500, 500, // a-z
    334, 260, 334, 584, // {..~
];

const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Width of `text` in millimetres at `size` points
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c as u32 {
            code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize] as u32,
            _ => 556,
        })
        .sum();

    units as f32 / 1000.0 * size / POINTS_PER_MM
}

/// Greedy word wrap to `max_width` millimetres; words wider than a line are split
pub fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if text_width(&candidate, size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            for c in word.chars() {
                current.push(c);
                if text_width(&current, size) > max_width {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}
