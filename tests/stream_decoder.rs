//! Stream decoder integration tests: chunk-boundary invariance, malformed
//! line recovery, and termination behavior over the full session machine.

use bytes::Bytes;
use futures::stream;
use proptest::prelude::*;
use statstream::client::ClientError;
use statstream::session::{consume_stream, FeedOutcome, StreamSession, NO_CONTENT_FALLBACK};

const WIRE: &str = "data: {\"content\": \"均值 = 4.2\"}\n\
                    \n\
                    : keep-alive\n\
                    data: {\"content\": \" (p < 0.05)\"}\n\
                    data: [DONE]\n";
const EXPECTED: &str = "均值 = 4.2 (p < 0.05)";

/// Feed byte chunks through a session exactly as the consumer loop would,
/// collecting every sink notification.
fn run_session(chunks: &[&[u8]]) -> (String, Vec<String>) {
    let mut session = StreamSession::new();
    let mut updates = Vec::new();
    let mut sink = |text: &str| updates.push(text.to_string());

    for chunk in chunks {
        if session.feed(chunk, &mut sink) == FeedOutcome::Ended {
            break;
        }
    }
    let final_text = session.finish(&mut sink);
    assert!(!session.is_active());
    (final_text, updates)
}

#[test]
fn whole_stream_in_one_chunk() {
    let (final_text, updates) = run_session(&[WIRE.as_bytes()]);
    assert_eq!(final_text, EXPECTED);
    assert_eq!(updates, vec!["均值 = 4.2".to_string(), EXPECTED.to_string()]);
}

#[test]
fn split_inside_multibyte_character() {
    let bytes = WIRE.as_bytes();
    // "均" starts at the first non-ASCII byte; cut in the middle of it.
    let cut = bytes.iter().position(|&b| b > 0x7f).unwrap() + 1;
    let (final_text, _) = run_session(&[&bytes[..cut], &bytes[cut..]]);
    assert_eq!(final_text, EXPECTED);
}

#[test]
fn byte_at_a_time() {
    let chunks: Vec<&[u8]> = WIRE.as_bytes().chunks(1).collect();
    let (final_text, _) = run_session(&chunks);
    assert_eq!(final_text, EXPECTED);
}

proptest! {
    /// Splitting the same byte sequence at arbitrary boundaries (mid-line,
    /// mid-character) never changes the decoded result.
    #[test]
    fn chunk_boundary_invariance(mut cuts in proptest::collection::vec(0..WIRE.len(), 0..12)) {
        cuts.sort_unstable();
        cuts.dedup();

        let bytes = WIRE.as_bytes();
        let mut chunks: Vec<&[u8]> = Vec::new();
        let mut start = 0;
        for cut in cuts {
            chunks.push(&bytes[start..cut]);
            start = cut;
        }
        chunks.push(&bytes[start..]);

        let (final_text, updates) = run_session(&chunks);
        prop_assert_eq!(final_text.as_str(), EXPECTED);
        // Every notification carries the full text-so-far, so each one is a
        // prefix of the next and the last equals the final result.
        for pair in updates.windows(2) {
            prop_assert!(pair[1].starts_with(pair[0].as_str()));
        }
        prop_assert_eq!(updates.last().map(String::as_str), Some(EXPECTED));
    }
}

#[test]
fn malformed_line_is_skipped_not_fatal() {
    let wire = "data: {\"content\": \"a\"}\n\
                data: {broken json!!\n\
                data: {\"content\": \"b\"}\n\
                data: [DONE]\n";
    let (final_text, _) = run_session(&[wire.as_bytes()]);
    assert_eq!(final_text, "ab");
}

#[test]
fn reader_done_without_done_marker_processes_tail() {
    // No [DONE], no trailing newline on the last event line.
    let wire = "data: {\"content\": \"a\"}\ndata: {\"content\": \"b\"}";
    let (final_text, _) = run_session(&[wire.as_bytes()]);
    assert_eq!(final_text, "ab");
}

#[test]
fn empty_stream_yields_fallback_message() {
    let (final_text, updates) = run_session(&[b"\n\n: ping\n"]);
    assert_eq!(final_text, NO_CONTENT_FALLBACK);
    assert_eq!(updates, vec![NO_CONTENT_FALLBACK.to_string()]);
}

#[test]
fn done_with_no_content_yields_fallback_message() {
    let (final_text, _) = run_session(&[b"data: [DONE]\n"]);
    assert_eq!(final_text, NO_CONTENT_FALLBACK);
}

#[tokio::test]
async fn consume_stream_matches_sync_feeding() {
    let chunks: Vec<Result<Bytes, ClientError>> = WIRE
        .as_bytes()
        .chunks(7)
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();

    let mut session = StreamSession::new();
    let final_text = consume_stream(&mut session, stream::iter(chunks), |_| {})
        .await
        .unwrap();

    assert_eq!(final_text, EXPECTED);
    assert!(!session.is_active());
}

#[tokio::test]
async fn transport_error_propagates_once_and_finalizes() {
    let chunks: Vec<Result<Bytes, ClientError>> = vec![
        Ok(Bytes::from_static(b"data: {\"content\": \"kept\"}\n")),
        Err(ClientError::Config("broken pipe".to_string())),
    ];

    let mut session = StreamSession::new();
    let mut updates = Vec::new();
    let err = consume_stream(&mut session, stream::iter(chunks), |t: &str| {
        updates.push(t.to_string())
    })
    .await
    .unwrap_err();

    assert!(matches!(err, ClientError::Config(_)));
    assert!(!session.is_active());
    // Content received before the failure is retained, and no fallback or
    // extra notification fires after the error.
    assert_eq!(session.accumulated_text(), "kept");
    assert_eq!(updates, vec!["kept".to_string()]);
}
