use super::*;

#[test]
fn single_message() {
    let mut dec = SseDecoder::new();
    let out = dec.feed(b"data: {\"type\":\"complete\"}\n\n");
    assert_eq!(out, vec![r#"{"type":"complete"}"#]);
}

#[test]
fn message_split_across_chunks() {
    let mut dec = SseDecoder::new();
    assert!(dec.feed(b"data: {\"ty").is_empty());
    assert!(dec.feed(b"pe\":\"complete\"}\n").is_empty());
    assert_eq!(dec.feed(b"\n"), vec![r#"{"type":"complete"}"#]);
}

#[test]
fn several_messages_in_one_chunk() {
    let mut dec = SseDecoder::new();
    let out = dec.feed(b"data: one\n\ndata: two\n\n");
    assert_eq!(out, vec!["one", "two"]);
}

#[test]
fn crlf_line_endings() {
    let mut dec = SseDecoder::new();
    let out = dec.feed(b"data: hello\r\n\r\n");
    assert_eq!(out, vec!["hello"]);
}

#[test]
fn multi_line_data_is_joined_with_newline() {
    let mut dec = SseDecoder::new();
    let out = dec.feed(b"data: first\ndata: second\n\n");
    assert_eq!(out, vec!["first\nsecond"]);
}

#[test]
fn data_without_space_after_colon() {
    let mut dec = SseDecoder::new();
    assert_eq!(dec.feed(b"data:tight\n\n"), vec!["tight"]);
}

#[test]
fn comments_and_id_lines_are_ignored() {
    let mut dec = SseDecoder::new();
    let out = dec.feed(b": keepalive\nid: 7\nretry: 1000\ndata: body\n\n");
    assert_eq!(out, vec!["body"]);
}

#[test]
fn blank_line_without_data_dispatches_nothing() {
    let mut dec = SseDecoder::new();
    assert!(dec.feed(b"\n\n: ping\n\n").is_empty());
}

#[test]
fn explicit_message_event_is_delivered() {
    let mut dec = SseDecoder::new();
    assert_eq!(dec.feed(b"event: message\ndata: x\n\n"), vec!["x"]);
}

#[test]
fn named_events_are_skipped_and_reset() {
    let mut dec = SseDecoder::new();
    let out = dec.feed(b"event: progress\ndata: 50%\n\ndata: real\n\n");
    assert_eq!(out, vec!["real"]);
}

#[test]
fn unterminated_message_is_held_back() {
    let mut dec = SseDecoder::new();
    assert!(dec.feed(b"data: pending\n").is_empty());
}
