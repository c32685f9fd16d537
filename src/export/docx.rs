//! Word-processor document encoder: a bold centered title paragraph
//! followed by a single full-width table.

use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, Paragraph, Run, Table, TableCell, TableRow, WidthType};

use super::{cell_text, encoding_err, ExportError, ExportTable};

/// OOXML `pct` table widths are fiftieths of a percent; 5000 = 100%.
const FULL_WIDTH_PCT: usize = 5000;
/// Title run size in half-points (16 pt).
const TITLE_HALF_POINTS: usize = 32;

pub fn encode(table: &ExportTable) -> Result<Vec<u8>, ExportError> {
    let headers = table.headers();

    let header_row = TableRow::new(
        headers
            .iter()
            .map(|header| cell(Run::new().add_text(*header).bold()))
            .collect(),
    );

    let mut rows = vec![header_row];
    for record in table.records() {
        rows.push(TableRow::new(
            headers
                .iter()
                .map(|header| cell(Run::new().add_text(cell_text(record.get(*header)))))
                .collect(),
        ));
    }

    let title = Paragraph::new()
        .align(AlignmentType::Center)
        .add_run(
            Run::new()
                .add_text(table.heading())
                .bold()
                .size(TITLE_HALF_POINTS),
        );

    let doc = Docx::new()
        .add_paragraph(title)
        .add_table(Table::new(rows).width(FULL_WIDTH_PCT, WidthType::Pct));

    let mut buffer = Cursor::new(Vec::new());
    doc.build().pack(&mut buffer).map_err(encoding_err)?;
    Ok(buffer.into_inner())
}

fn cell(run: Run) -> TableCell {
    TableCell::new().add_paragraph(Paragraph::new().add_run(run))
}
