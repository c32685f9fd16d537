//! Server-Sent Events (SSE) line decoding utilities.
//!
//! The analysis gateway streams its narrative in an SSE-like framing:
//! ```text
//! data: {"content": "partial text"}
//!
//! data: [DONE]
//! ```
//!
//! Transport chunks arrive with arbitrary boundaries: a single logical line
//! may be split across two reads, and one read may carry several complete
//! lines plus a partial tail. Decoding therefore buffers raw bytes and only
//! yields lines once fully received. Buffering at the byte level also means
//! a chunk boundary falling inside a multi-byte UTF-8 sequence is harmless;
//! the incomplete sequence simply stays in the buffer until its line
//! completes.

use bytes::BytesMut;

/// Re-assembles logical lines from a chunked byte stream.
///
/// Bytes are appended to an internal buffer and split on `\n`. Every
/// newline-terminated line is returned as soon as it completes; the
/// unterminated tail is retained for the next chunk, so no data is ever
/// dropped at a chunk boundary.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    raw: BytesMut,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return all lines it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.raw.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.raw.iter().position(|&b| b == b'\n') {
            let line = self.raw.split_to(pos + 1);
            lines.push(to_text(&line[..pos]));
        }
        lines
    }

    /// Drain the remaining unterminated line, if any, at stream end.
    pub fn finish(&mut self) -> Option<String> {
        if self.raw.is_empty() {
            return None;
        }
        let tail = self.raw.split();
        Some(to_text(&tail))
    }
}

/// Decode one complete line to text.
///
/// Lines are converted only once fully received, so well-formed input never
/// splits a character here. Invalid bytes are replaced rather than aborting
/// the stream.
fn to_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(err) => {
            tracing::warn!(%err, "invalid UTF-8 in stream line, replacing");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Parse an SSE line to extract the data portion.
///
/// SSE lines are in the format: `data: <content>`
///
/// # Example
/// ```
/// use statstream::sse::parse_sse_line;
///
/// let line = "data: {\"key\": \"value\"}";
/// assert_eq!(parse_sse_line(line), Some("{\"key\": \"value\"}"));
///
/// let line = "invalid";
/// assert_eq!(parse_sse_line(line), None);
/// ```
pub fn parse_sse_line(line: &str) -> Option<&str> {
    line.strip_prefix("data: ").map(|s| s.trim())
}

/// Check if an SSE data line indicates the stream is done.
///
/// # Example
/// ```
/// use statstream::sse::is_done_marker;
///
/// assert!(is_done_marker("[DONE]"));
/// assert!(!is_done_marker("{\"content\": \"text\"}"));
/// ```
pub fn is_done_marker(data: &str) -> bool {
    data == "[DONE]"
}
