//! Stream session state machine.
//!
//! A [`StreamSession`] owns the mutable state of one in-flight stream
//! consumption: the line re-assembly buffer, the accumulated narrative text,
//! and the active flag. All mutation happens on the single consumer loop;
//! progress is reported through a caller-supplied sink that receives the
//! **full accumulated text** after every content delta (a "replace displayed
//! content" model, not an append model).

use bytes::Bytes;
use futures::{pin_mut, Stream, StreamExt};
use serde::Deserialize;

use crate::client::ClientError;
use crate::sse::{is_done_marker, parse_sse_line, SseLineBuffer};

/// Message surfaced when a stream ends without producing any content.
pub const NO_CONTENT_FALLBACK: &str = "No content received from the analysis stream.";

/// One decoded unit from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    /// Partial text fragment to append to the accumulated narrative.
    ContentDelta(String),
    /// The producer signalled completion with the `[DONE]` marker.
    StreamEnd,
}

#[derive(Debug, Deserialize)]
struct DeltaPayload {
    content: Option<String>,
}

/// Classify one fully assembled line.
///
/// Returns `None` for blank lines, lines without the `data: ` marker, and
/// event payloads that fail to parse or carry no content. Malformed JSON is
/// recovered here (logged and skipped) because the producer may emit partial
/// JSON that only resolves once buffering catches up on a later read.
pub fn decode_line(line: &str) -> Option<StreamFrame> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some(payload) = parse_sse_line(line) else {
        tracing::debug!(line, "skipping non-event stream line");
        return None;
    };

    if is_done_marker(payload) {
        return Some(StreamFrame::StreamEnd);
    }

    match serde_json::from_str::<DeltaPayload>(payload) {
        Ok(DeltaPayload {
            content: Some(text),
        }) if !text.is_empty() => Some(StreamFrame::ContentDelta(text)),
        Ok(_) => {
            tracing::debug!(payload, "event payload carried no content");
            None
        }
        Err(err) => {
            tracing::warn!(%err, payload, "skipping malformed event payload");
            None
        }
    }
}

/// Outcome of feeding one transport chunk into a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// Keep reading; more frames may follow.
    Continue,
    /// The terminal marker was seen; stop reading.
    Ended,
}

/// Mutable state of one in-flight stream consumption.
///
/// Created when a streaming request begins and mutated exclusively by the
/// single consumer loop. Every exit path (terminal marker, reader done,
/// transport error, cancellation) leaves the session inactive.
#[derive(Debug)]
pub struct StreamSession {
    lines: SseLineBuffer,
    accumulated: String,
    active: bool,
}

impl Default for StreamSession {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamSession {
    pub fn new() -> Self {
        Self {
            lines: SseLineBuffer::new(),
            accumulated: String::new(),
            active: true,
        }
    }

    /// All content fragments received so far, in arrival order.
    pub fn accumulated_text(&self) -> &str {
        &self.accumulated
    }

    /// True from session start until the terminal marker, reader end, or a
    /// transport failure.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Feed one transport chunk. The sink is invoked with the full
    /// accumulated text once per content delta; it may run many times per
    /// session and must tolerate repeated calls.
    pub fn feed(&mut self, chunk: &[u8], on_update: &mut dyn FnMut(&str)) -> FeedOutcome {
        for line in self.lines.push(chunk) {
            if self.apply_line(&line, on_update) == FeedOutcome::Ended {
                return FeedOutcome::Ended;
            }
        }
        FeedOutcome::Continue
    }

    fn apply_line(&mut self, line: &str, on_update: &mut dyn FnMut(&str)) -> FeedOutcome {
        match decode_line(line) {
            Some(StreamFrame::ContentDelta(text)) => {
                self.accumulated.push_str(&text);
                on_update(&self.accumulated);
                FeedOutcome::Continue
            }
            Some(StreamFrame::StreamEnd) => {
                self.active = false;
                FeedOutcome::Ended
            }
            None => FeedOutcome::Continue,
        }
    }

    /// Finalize at reader end: process the unterminated tail line (unless the
    /// terminal marker already ended the session), mark the session inactive,
    /// and substitute the no-content fallback when nothing was accumulated.
    ///
    /// Returns the final text the caller should display.
    pub fn finish(&mut self, on_update: &mut dyn FnMut(&str)) -> String {
        if self.active {
            if let Some(tail) = self.lines.finish() {
                self.apply_line(&tail, on_update);
            }
            self.active = false;
        }

        if self.accumulated.is_empty() {
            tracing::warn!("stream ended without any content");
            self.accumulated.push_str(NO_CONTENT_FALLBACK);
            on_update(&self.accumulated);
        }
        self.accumulated.clone()
    }

    /// Force-finalize without draining buffers; used on transport failure so
    /// no exit path leaves a session stuck in the active state.
    pub fn abort(&mut self) {
        self.active = false;
    }
}

/// Drive a session to completion over a chunked byte stream.
///
/// This is the single consumer loop: await a chunk, feed it, repeat until
/// the terminal marker or reader end. On a transport error the session is
/// force-finalized and the error propagates once to the caller. Dropping the
/// returned future releases the underlying stream and the sink is never
/// invoked afterwards.
pub async fn consume_stream<S, F>(
    session: &mut StreamSession,
    byte_stream: S,
    mut on_update: F,
) -> Result<String, ClientError>
where
    S: Stream<Item = Result<Bytes, ClientError>>,
    F: FnMut(&str),
{
    pin_mut!(byte_stream);

    while let Some(next) = byte_stream.next().await {
        match next {
            Ok(chunk) => {
                if session.feed(&chunk, &mut on_update) == FeedOutcome::Ended {
                    break;
                }
            }
            Err(err) => {
                session.abort();
                return Err(err);
            }
        }
    }

    Ok(session.finish(&mut on_update))
}
