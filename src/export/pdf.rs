//! PDF encoder: a single A4 page with a fixed-layout table.
//!
//! Layout: centered underlined title, then uniform column slots dividing the
//! usable width evenly across the headers, with a horizontal rule under the
//! header row and under every data row. Rendering is linear down the page;
//! there is no pagination, so very long tables run past the bottom edge.
//! Single-page rendering is the documented contract of this encoder.

use printpdf::{BuiltinFont, Line, Mm, PdfDocument, PdfLayerReference, Point, Pt};

use super::{cell_text, encoding_err, ExportError, ExportTable};

// A4 in PostScript points.
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 30.0;

const TITLE_SIZE: f32 = 20.0;
const BODY_SIZE: f32 = 10.0;
const ROW_HEIGHT: f32 = 15.0;
const ROW_GAP: f32 = 7.5;
const RULE_THICKNESS: f32 = 1.0;

pub fn encode(table: &ExportTable) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) = PdfDocument::new(
        table.heading(),
        Mm::from(Pt(PAGE_WIDTH)),
        Mm::from(Pt(PAGE_HEIGHT)),
        "table",
    );
    let layer = doc.get_page(page).get_layer(layer);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(encoding_err)?;

    let headers = table.headers();
    let usable_width = PAGE_WIDTH - 2.0 * MARGIN;
    let col_width = usable_width / headers.len() as f32;

    // Vertical cursor measured down from the top edge; the PDF coordinate
    // origin is bottom-left, so `at_y` flips it.
    let mut cursor = MARGIN + TITLE_SIZE;

    // Centered, underlined title.
    let title_width = text_width(table.heading(), TITLE_SIZE);
    let title_x = (PAGE_WIDTH - title_width).max(0.0) / 2.0;
    layer.use_text(table.heading(), TITLE_SIZE, at_x(title_x), at_y(cursor), &font);
    rule(&layer, title_x, title_x + title_width, cursor + 3.0);
    cursor += TITLE_SIZE + ROW_HEIGHT;

    // Header row, each header centered in its column slot.
    for (i, header) in headers.iter().enumerate() {
        let x = slot_center(i as f32 * col_width, col_width, header, BODY_SIZE);
        layer.use_text(*header, BODY_SIZE, at_x(x), at_y(cursor), &font);
    }
    rule(&layer, MARGIN, PAGE_WIDTH - MARGIN, cursor + 3.0);
    cursor += ROW_HEIGHT;

    // Data rows: cells centered per slot, a rule under each row, then
    // inter-row spacing. Row height is uniform regardless of content.
    for record in table.records() {
        for (i, header) in headers.iter().enumerate() {
            let text = cell_text(record.get(*header));
            let x = slot_center(i as f32 * col_width, col_width, &text, BODY_SIZE);
            layer.use_text(text, BODY_SIZE, at_x(x), at_y(cursor), &font);
        }
        cursor += ROW_HEIGHT;
        rule(&layer, MARGIN, PAGE_WIDTH - MARGIN, cursor - BODY_SIZE / 2.0);
        cursor += ROW_GAP;
    }

    doc.save_to_bytes().map_err(encoding_err)
}

/// Approximate advance width of Helvetica text. Good enough to center
/// strings within their slot without shipping font metrics.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

/// X offset that centers `text` within the column slot starting at `offset`
/// (relative to the left margin).
fn slot_center(offset: f32, col_width: f32, text: &str, size: f32) -> f32 {
    MARGIN + offset + (col_width - text_width(text, size)).max(0.0) / 2.0
}

fn at_x(pt: f32) -> Mm {
    Mm::from(Pt(pt))
}

fn at_y(cursor: f32) -> Mm {
    Mm::from(Pt(PAGE_HEIGHT - cursor))
}

/// Horizontal rule from `x0` to `x1` at the given vertical cursor.
fn rule(layer: &PdfLayerReference, x0: f32, x1: f32, cursor: f32) {
    layer.set_outline_thickness(RULE_THICKNESS);
    layer.add_line(Line {
        points: vec![
            (Point::new(at_x(x0), at_y(cursor)), false),
            (Point::new(at_x(x1), at_y(cursor)), false),
        ],
        is_closed: false,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{ExportFormat, ExportRequest};
    use serde_json::json;

    fn table(body: serde_json::Value) -> ExportTable {
        serde_json::from_value::<ExportRequest>(body)
            .unwrap()
            .into_table(ExportFormat::Pdf)
            .unwrap()
    }

    #[test]
    fn test_encode_produces_pdf() {
        let table = table(json!({
            "data": [{ "A": 1, "B": 2 }, { "A": 3, "B": 4 }],
            "title": "t"
        }));
        let bytes = encode(&table).unwrap();

        assert_eq!(&bytes[..5], b"%PDF-");
        assert!(bytes.len() > 100);
    }

    #[test]
    fn test_encode_does_not_paginate_long_tables() {
        // More rows than fit on one A4 page; rendering stays linear and
        // must not fail.
        let rows: Vec<_> = (0..80).map(|i| json!({ "idx": i, "v": i * 2 })).collect();
        let table = table(json!({ "data": rows, "title": "long" }));
        assert!(encode(&table).is_ok());
    }

    #[test]
    fn test_text_width_approximation_is_monotonic() {
        assert!(text_width("abcdef", 10.0) > text_width("abc", 10.0));
        assert_eq!(text_width("", 10.0), 0.0);
    }
}
