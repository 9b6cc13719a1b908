//! Minimal PDF 1.4 emission.
//!
//! Just enough of the PDF object model for a single fixed-layout page:
//! catalog, page tree, two base-14 Type1 fonts (Helvetica and
//! Helvetica-Bold, WinAnsiEncoding), and one uncompressed content
//! stream. Object byte offsets are tracked while writing so the xref
//! table is exact.
//!
//! Text is escaped for the PDF string syntax; code points outside the
//! WinAnsi range degrade to `?` rather than producing an invalid
//! document. All coordinates are formatted with two decimal places so
//! output is byte-deterministic.

/// Fonts available to the content stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Font {
    /// Helvetica (resource `/F1`).
    Regular,
    /// Helvetica-Bold (resource `/F2`).
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

/// Approximate advance width of `text` at `size` points.
///
/// Helvetica metrics reduced to coarse character classes (thousandths of
/// an em). Close enough for centering display lines; not for
/// justification, which the layout never does.
pub(crate) fn text_width(text: &str, size: f64) -> f64 {
    let units: u32 = text
        .chars()
        .map(|c| match c {
            ' ' => 278,
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '!' | '\'' | '|' => 222,
            'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '-' => 333,
            'm' | 'M' | 'W' | 'w' => 833,
            'A'..='Z' => 667,
            '0'..='9' => 556,
            _ => 500,
        })
        .sum();
    f64::from(units) * size / 1000.0
}

/// Escape a string for a PDF literal string `( … )`.
///
/// Backslash and parentheses get a backslash escape; Latin-1 code points
/// above ASCII are written as octal escapes (valid under
/// WinAnsiEncoding); anything else becomes `?`.
pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => out.push_str(&format!("\\{:03o}", c as u32)),
            _ => out.push('?'),
        }
    }
    out
}

/// Accumulates page content stream operators.
#[derive(Debug, Default)]
pub(crate) struct Content {
    ops: String,
}

impl Content {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Place a line of text with its left edge at (`x`, `y`).
    pub(crate) fn text(&mut self, font: Font, size: f64, x: f64, y: f64, text: &str) {
        self.ops.push_str(&format!(
            "BT /{} {size:.2} Tf {x:.2} {y:.2} Td ({}) Tj ET\n",
            font.resource(),
            escape_text(text),
        ));
    }

    /// Place a line of text horizontally centered on `center_x`.
    pub(crate) fn text_centered(
        &mut self,
        font: Font,
        size: f64,
        center_x: f64,
        y: f64,
        text: &str,
    ) {
        let x = center_x - text_width(text, size) / 2.0;
        self.text(font, size, x, y, text);
    }

    /// Stroke a horizontal line from `x1` to `x2` at height `y`.
    pub(crate) fn hline(&mut self, x1: f64, x2: f64, y: f64, width: f64) {
        self.ops.push_str(&format!(
            "{width:.2} w {x1:.2} {y:.2} m {x2:.2} {y:.2} l S\n"
        ));
    }

    /// Stroke a rectangle with lower-left corner (`x`, `y`).
    pub(crate) fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, width: f64) {
        self.ops.push_str(&format!(
            "{width:.2} w {x:.2} {y:.2} {w:.2} {h:.2} re S\n"
        ));
    }

    fn into_stream(self) -> String {
        self.ops
    }
}

/// Assemble a complete single-page document.
pub(crate) fn build_document(page_width: f64, page_height: f64, content: Content) -> Vec<u8> {
    let stream = content.into_stream();

    let mut buf: Vec<u8> = Vec::with_capacity(stream.len() + 1024);
    let mut offsets: Vec<usize> = Vec::with_capacity(6);

    buf.extend_from_slice(b"%PDF-1.4\n");

    let mut begin_obj = |buf: &mut Vec<u8>, offsets: &mut Vec<usize>, id: usize| {
        offsets.push(buf.len());
        buf.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
    };

    begin_obj(&mut buf, &mut offsets, 1);
    buf.extend_from_slice(b"<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    begin_obj(&mut buf, &mut offsets, 2);
    buf.extend_from_slice(b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n");

    begin_obj(&mut buf, &mut offsets, 3);
    buf.extend_from_slice(
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {page_width:.2} {page_height:.2}] \
             /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>\nendobj\n"
        )
        .as_bytes(),
    );

    begin_obj(&mut buf, &mut offsets, 4);
    buf.extend_from_slice(
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
          /Encoding /WinAnsiEncoding >>\nendobj\n",
    );

    begin_obj(&mut buf, &mut offsets, 5);
    buf.extend_from_slice(
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold \
          /Encoding /WinAnsiEncoding >>\nendobj\n",
    );

    begin_obj(&mut buf, &mut offsets, 6);
    buf.extend_from_slice(format!("<< /Length {} >>\nstream\n", stream.len()).as_bytes());
    buf.extend_from_slice(stream.as_bytes());
    buf.extend_from_slice(b"endstream\nendobj\n");

    let xref_offset = buf.len();
    buf.extend_from_slice(format!("xref\n0 {}\n", offsets.len() + 1).as_bytes());
    buf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        buf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    buf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            offsets.len() + 1
        )
        .as_bytes(),
    );

    buf
}
