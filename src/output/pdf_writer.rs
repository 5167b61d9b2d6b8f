//! PDF 1.4 serialization of a laid-out `PdfDocument`
//!
//! Object layout:
//! - 1: catalog
//! - 2: page tree
//! - 3, 4: Helvetica and Helvetica-Bold (standard 14 fonts, not embedded)
//! - then one page object and one content stream per page

use crate::output::pdf::{
    text_width, Align, Color, Font, PdfDocument, PdfElement, PAGE_HEIGHT, PAGE_WIDTH,
};

const POINTS_PER_MM: f32 = 72.0 / 25.4;
const FIRST_PAGE_OBJECT: usize = 5;

impl PdfDocument {
    /// Serializes the document to PDF bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();

        out.extend_from_slice(b"%PDF-1.4\n");

        let page_ids: Vec<usize> = (0..self.pages.len())
            .map(|i| FIRST_PAGE_OBJECT + i * 2)
            .collect();
        let kids = page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");

        write_object(&mut out, &mut offsets, "<< /Type /Catalog /Pages 2 0 R >>");
        write_object(
            &mut out,
            &mut offsets,
            &format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids,
                self.pages.len()
            ),
        );
        write_object(
            &mut out,
            &mut offsets,
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        );
        write_object(
            &mut out,
            &mut offsets,
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
        );

        for (page, page_id) in self.pages.iter().zip(&page_ids) {
            write_object(
                &mut out,
                &mut offsets,
                &format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                    fmt_num(PAGE_WIDTH * POINTS_PER_MM),
                    fmt_num(PAGE_HEIGHT * POINTS_PER_MM),
                    page_id + 1
                ),
            );

            let content = content_stream(&page.elements);
            offsets.push(out.len());
            out.extend_from_slice(
                format!("{} 0 obj\n<< /Length {} >>\nstream\n", offsets.len(), content.len())
                    .as_bytes(),
            );
            out.extend_from_slice(content.as_bytes());
            out.extend_from_slice(b"\nendstream\nendobj\n");
        }

        let xref_offset = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", offsets.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                offsets.len() + 1,
                xref_offset
            )
            .as_bytes(),
        );

        out
    }
}

fn write_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, body: &str) {
    offsets.push(out.len());
    out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", offsets.len(), body).as_bytes());
}

fn content_stream(elements: &[PdfElement]) -> String {
    let mut ops = Vec::with_capacity(elements.len());

    for element in elements {
        match element {
            PdfElement::Text {
                x,
                y,
                text,
                font,
                size,
                color,
                align,
            } => {
                let left = match align {
                    Align::Left => *x,
                    Align::Center => x - text_width(text, *size) / 2.0,
                };
                let font_name = match font {
                    Font::Helvetica => "F1",
                    Font::HelveticaBold => "F2",
                };
                ops.push(format!(
                    "BT /{} {} Tf {} rg {} {} Td ({}) Tj ET",
                    font_name,
                    fmt_num(*size),
                    fmt_color(*color),
                    fmt_num(left * POINTS_PER_MM),
                    fmt_num(flip_y(*y)),
                    escape_string(text)
                ));
            }
            PdfElement::Line { from, to, color } => {
                ops.push(format!(
                    "{} RG 0.5 w {} {} m {} {} l S",
                    fmt_color(*color),
                    fmt_num(from.0 * POINTS_PER_MM),
                    fmt_num(flip_y(from.1)),
                    fmt_num(to.0 * POINTS_PER_MM),
                    fmt_num(flip_y(to.1))
                ));
            }
        }
    }

    ops.join("\n")
}

/// Converts a top-down millimetre y into bottom-up points
fn flip_y(y_mm: f32) -> f32 {
    (PAGE_HEIGHT - y_mm) * POINTS_PER_MM
}

fn fmt_num(value: f32) -> String {
    format!("{:.2}", value)
}

fn fmt_color(color: Color) -> String {
    let Color(r, g, b) = color;
    format!(
        "{:.3} {:.3} {:.3}",
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0
    )
}

/// Escapes a literal string for a PDF content stream
fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}
