//! Tabular document export pipeline.
//!
//! Three independent encoders (spreadsheet, PDF, word-processor document)
//! share one input contract: an ordered sequence of key/value records plus a
//! title. Column headers come from the key order of the first record;
//! subsequent records are rendered positionally against that header set even
//! when their own key sets differ (missing keys render empty).
//!
//! Each export call is stateless and synchronous; the whole document is
//! assembled in memory and handed back as a byte buffer.

pub mod docx;
pub mod pdf;
pub mod xlsx;

use nonempty::NonEmpty;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Default filename stem when the caller supplies no title.
pub const DEFAULT_TITLE: &str = "export";

/// Default in-document heading when the caller supplies no title.
pub const DEFAULT_HEADING: &str = "Exported Data";

/// One row of tabular data destined for a document export.
///
/// Values are loose scalars (string, number, boolean, null); whatever is
/// there gets rendered. Key order is preserved on deserialization.
pub type ExportRecord = Map<String, Value>;

#[derive(Error, Debug)]
pub enum ExportError {
    /// Malformed or missing export input; maps to a 400 at the handler and
    /// never reaches format-encoder code.
    #[error("{0}")]
    Validation(String),

    /// Failure inside a format encoder; logged server-side and surfaced to
    /// the client as a generic 500.
    #[error("encoding failed: {0}")]
    Encoding(String),
}

/// Wrap any encoder-library error as an [`ExportError::Encoding`].
pub(crate) fn encoding_err(err: impl std::fmt::Display) -> ExportError {
    ExportError::Encoding(err.to_string())
}

/// Output format selector with the per-format HTTP metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Pdf,
    Docx,
}

impl ExportFormat {
    /// Human-readable name used in client-facing error bodies.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "Excel",
            ExportFormat::Pdf => "PDF",
            ExportFormat::Docx => "Word",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Raw request body for the export endpoints.
///
/// `data` is accepted as an arbitrary JSON value so that a missing field, a
/// non-array, and an empty array all fail validation with the same clean
/// 400 instead of a deserializer rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ExportRequest {
    /// Validate into an encodable table.
    ///
    /// Rejects missing, non-array, or empty `data` before any
    /// format-specific work happens.
    pub fn into_table(self, format: ExportFormat) -> Result<ExportTable, ExportError> {
        let no_data =
            || ExportError::Validation(format!("No data provided for {} export.", format.label()));

        let rows = match self.data {
            Some(Value::Array(rows)) => rows,
            _ => return Err(no_data()),
        };

        let records = rows
            .into_iter()
            .map(|row| match row {
                Value::Object(record) => Ok(record),
                _ => Err(ExportError::Validation(
                    "Export data must be an array of objects.".to_string(),
                )),
            })
            .collect::<Result<Vec<ExportRecord>, ExportError>>()?;

        let Some(records) = NonEmpty::from_vec(records) else {
            return Err(no_data());
        };

        let title = self.title.filter(|t| !t.is_empty());

        Ok(ExportTable { records, title })
    }
}

/// A validated, non-empty table ready for any encoder.
#[derive(Debug, Clone)]
pub struct ExportTable {
    records: NonEmpty<ExportRecord>,
    title: Option<String>,
}

impl ExportTable {
    /// Title as supplied by the caller, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// In-document heading; falls back to a fixed label when no title was
    /// supplied.
    pub fn heading(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_HEADING)
    }

    /// Filename stem for the download headers; the fallback differs from
    /// the heading fallback on purpose.
    pub fn filename_stem(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Column headers: the key order of the first record.
    pub fn headers(&self) -> Vec<&str> {
        self.records.first().keys().map(String::as_str).collect()
    }

    /// Records in input order, header row excluded.
    pub fn records(&self) -> impl Iterator<Item = &ExportRecord> {
        self.records.iter()
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }
}

/// String form of one scalar cell. Strings render verbatim; numbers and
/// booleans via their JSON form; null and missing keys render empty.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Run the encoder for `format` over a validated table.
pub fn encode(table: &ExportTable, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Xlsx => xlsx::encode(table),
        ExportFormat::Pdf => pdf::encode(table),
        ExportFormat::Docx => docx::encode(table),
    }
}

/// Characters escaped in the download filename. Mirrors JavaScript's
/// `encodeURIComponent`, which the RFC 5987 `filename*` parameter accepts.
const FILENAME_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `Content-Disposition` value carrying both the UTF-8 extended filename and
/// an encoded plain fallback, for maximum client compatibility.
pub fn content_disposition(title: &str, format: ExportFormat) -> String {
    let stem = if title.is_empty() { DEFAULT_TITLE } else { title };
    let encoded = utf8_percent_encode(stem, FILENAME_ESCAPES);
    let ext = format.extension();
    format!("attachment; filename*=UTF-8''{encoded}.{ext}; filename=\"{encoded}.{ext}\"")
}
