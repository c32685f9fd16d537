//! Spreadsheet encoder: a single-sheet workbook with a header row followed
//! by one worksheet row per record.

use rust_xlsxwriter::{Workbook, XlsxError};
use serde_json::Value;

use super::{cell_text, encoding_err, ExportError, ExportTable};

/// Fixed display width for every column.
const COLUMN_WIDTH: f64 = 20.0;

pub fn encode(table: &ExportTable) -> Result<Vec<u8>, ExportError> {
    build(table).map_err(encoding_err)
}

fn build(table: &ExportTable) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    // An arbitrary title may not be a legal sheet name; keep the library
    // default when it is missing or not legal.
    if let Some(title) = table.title() {
        let _ = sheet.set_name(title);
    }

    let headers = table.headers();
    for (col, header) in headers.iter().enumerate() {
        let col = col as u16;
        sheet.write_string(0, col, *header)?;
        sheet.set_column_width(col, COLUMN_WIDTH)?;
    }

    for (row, record) in table.records().enumerate() {
        let row = (row + 1) as u32;
        for (col, header) in headers.iter().enumerate() {
            let col = col as u16;
            match record.get(*header) {
                Some(Value::Number(n)) => {
                    if let Some(f) = n.as_f64() {
                        sheet.write_number(row, col, f)?;
                    } else {
                        sheet.write_string(row, col, n.to_string())?;
                    }
                }
                Some(Value::Bool(b)) => {
                    sheet.write_boolean(row, col, *b)?;
                }
                other => {
                    sheet.write_string(row, col, cell_text(other))?;
                }
            }
        }
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{ExportFormat, ExportRequest};
    use serde_json::json;

    fn table(body: serde_json::Value) -> ExportTable {
        serde_json::from_value::<ExportRequest>(body)
            .unwrap()
            .into_table(ExportFormat::Xlsx)
            .unwrap()
    }

    #[test]
    fn test_encode_produces_xlsx_package() {
        let table = table(json!({
            "data": [{ "A": 1, "B": 2 }, { "A": 3, "B": 4 }],
            "title": "t"
        }));
        let bytes = encode(&table).unwrap();

        // XLSX is an OOXML ZIP package.
        assert_eq!(&bytes[..2], b"PK");
        assert!(bytes.len() > 100);
    }

    #[test]
    fn test_encode_tolerates_ragged_and_mixed_records() {
        let table = table(json!({
            "data": [
                { "metric": "mean", "value": 4.2, "significant": true },
                { "value": null },
                { "metric": "中位数", "unlisted": "ignored" }
            ],
            "title": "销售报告 2024"
        }));
        assert!(encode(&table).is_ok());
    }
}
