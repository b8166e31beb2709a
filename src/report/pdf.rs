//! Just enough PDF 1.4 to put vector charts on pages: filled shapes, lines and
//! Helvetica text. Coordinates are PDF points with the origin at the bottom
//! left of the page.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::charts::ChartColor;

/// Rough Helvetica advance width as a fraction of the font size. Good enough
/// to center short labels.
const AVG_GLYPH_WIDTH: f64 = 0.5;

pub struct Page {
    width: f64,
    height: f64,
    content: String,
}

impl Page {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            content: String::new(),
        }
    }

    pub fn fill_color(&mut self, color: ChartColor) {
        let (r, g, b) = unit_rgb(color);
        let _ = writeln!(self.content, "{r:.3} {g:.3} {b:.3} rg");
    }

    pub fn stroke_color(&mut self, color: ChartColor) {
        let (r, g, b) = unit_rgb(color);
        let _ = writeln!(self.content, "{r:.3} {g:.3} {b:.3} RG");
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let _ = writeln!(self.content, "{x:.2} {y:.2} {width:.2} {height:.2} re f");
    }

    pub fn line(&mut self, from: (f64, f64), to: (f64, f64)) {
        let _ = writeln!(
            self.content,
            "{:.2} {:.2} m {:.2} {:.2} l S",
            from.0, from.1, to.0, to.1
        );
    }

    /// Closed polygon, filled with the current fill color and outlined with
    /// the current stroke color.
    pub fn polygon(&mut self, points: &[(f64, f64)]) {
        let Some(((x, y), rest)) = points.split_first() else {
            return;
        };
        let _ = write!(self.content, "{x:.2} {y:.2} m");
        for (x, y) in rest {
            let _ = write!(self.content, " {x:.2} {y:.2} l");
        }
        self.content.push_str(" h B\n");
    }

    pub fn text(&mut self, x: f64, y: f64, size: f64, text: &str) {
        let _ = writeln!(
            self.content,
            "BT /F1 {size:.1} Tf {x:.2} {y:.2} Td ({}) Tj ET",
            escape_text(text)
        );
    }

    pub fn text_centered(&mut self, center_x: f64, y: f64, size: f64, text: &str) {
        self.text(center_x - text_width(text, size) / 2.0, y, size, text);
    }

    /// Text rotated 90 degrees counter-clockwise, centered on `center_y`.
    pub fn text_vertical(&mut self, x: f64, center_y: f64, size: f64, text: &str) {
        let y = center_y - text_width(text, size) / 2.0;
        let _ = writeln!(
            self.content,
            "BT /F1 {size:.1} Tf 0 1 -1 0 {x:.2} {y:.2} Tm ({}) Tj ET",
            escape_text(text)
        );
    }
}

#[derive(Default)]
pub struct PdfDocument {
    pages: Vec<Page>,
}

impl PdfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize the whole document. Objects are numbered catalog (1), page
    /// tree (2), font (3), then a page/content pair per page.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let kids = (0..self.pages.len())
            .map(|idx| format!("{} 0 R", page_object_id(idx)))
            .collect::<Vec<_>>()
            .join(" ");

        push_object(
            &mut out,
            &mut offsets,
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        );
        push_object(
            &mut out,
            &mut offsets,
            format!(
                "<< /Type /Pages /Kids [{kids}] /Count {} >>",
                self.pages.len()
            ),
        );
        push_object(
            &mut out,
            &mut offsets,
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );

        for (idx, page) in self.pages.iter().enumerate() {
            push_object(
                &mut out,
                &mut offsets,
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                     /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                    page.width,
                    page.height,
                    page_object_id(idx) + 1
                ),
            );
            push_object(
                &mut out,
                &mut offsets,
                format!(
                    "<< /Length {} >>\nstream\n{}\nendstream",
                    page.content.len(),
                    page.content
                ),
            );
        }

        let xref_offset = out.len();
        let mut trailer = format!("xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1);
        for offset in &offsets {
            let _ = write!(trailer, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            trailer,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            offsets.len() + 1
        );
        out.extend_from_slice(trailer.as_bytes());
        out
    }

    /// Write the document next to `path` and move it into place, so `path`
    /// only ever holds a complete file.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let partial = path.with_extension("pdf.part");
        fs::write(&partial, self.to_bytes())?;
        fs::rename(&partial, path)
    }
}

fn page_object_id(page_index: usize) -> usize {
    4 + page_index * 2
}

fn push_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, body: String) {
    offsets.push(out.len());
    let header = format!("{} 0 obj\n", offsets.len());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(body.as_bytes());
    out.extend_from_slice(b"\nendobj\n");
}

fn unit_rgb(color: ChartColor) -> (f64, f64, f64) {
    (
        f64::from(color.r) / 255.0,
        f64::from(color.g) / 255.0,
        f64::from(color.b) / 255.0,
    )
}

pub(crate) fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * AVG_GLYPH_WIDTH
}

/// Escape a string for a PDF literal. Characters the WinAnsi font encoding
/// covers are written as octal codes; anything else becomes `?`.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ' '..='~' => escaped.push(ch),
            _ => match win_ansi_code(ch) {
                Some(code) => {
                    let _ = write!(escaped, "\\{code:03o}");
                }
                None => escaped.push('?'),
            },
        }
    }
    escaped
}

/// WinAnsiEncoding byte for a non-ASCII character: Latin-1 maps onto itself
/// above 0xA0, the 0x80..0x9F block holds typographic extras.
fn win_ansi_code(ch: char) -> Option<u8> {
    let code = match ch {
        '\u{A0}'..='\u{FF}' => return u8::try_from(u32::from(ch)).ok(),
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(code)
}
