use hexfind::{
    CancelToken, Direction, FindMode, FindOutcome, FindQuery, FindSession, IntWidth, compile,
    find, find_all,
};
use utils::MemorySource;

/// A small WAV-shaped buffer with three "data" markers in its payload.
fn sample_buffer() -> MemorySource {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&100u32.to_le_bytes());
    buf.extend_from_slice(b"WAVE");
    for filler in [b"data....", b"DATA....", b"data...."] {
        buf.extend_from_slice(filler);
    }
    buf.extend_from_slice(&256u32.to_le_bytes());
    MemorySource::new(buf)
}

#[test]
fn text_search_over_a_source_object() {
    let source = sample_buffer();
    let pattern = compile("data", FindMode::Text).unwrap();
    let token = CancelToken::new();

    assert_eq!(
        find(&source, &pattern, Direction::Forward, 0, true, &token),
        FindOutcome::Found(12)
    );
    // case-insensitive also accepts the DATA marker
    let hits: Vec<u64> = find_all(&source, &pattern, false, &token).collect();
    assert_eq!(hits, vec![12, 20, 28]);
    let exact: Vec<u64> = find_all(&source, &pattern, true, &token).collect();
    assert_eq!(exact, vec![12, 28]);
}

#[test]
fn int_search_finds_encoded_value() {
    let source = sample_buffer();
    let pattern = compile("256", FindMode::Int { width: IntWidth::W4 }).unwrap();
    let token = CancelToken::new();

    let offset = match find(&source, &pattern, Direction::Forward, 0, true, &token) {
        FindOutcome::Found(offset) => offset,
        other => panic!("expected a hit, got {:?}", other),
    };
    assert_eq!(offset, 36);
}

#[test]
fn session_drives_interactive_find_next() {
    let source = sample_buffer();
    let mut session = FindSession::new();
    session
        .set_query(FindQuery {
            pattern: "data".to_string(),
            mode: FindMode::Text,
            case_sensitive: true,
        })
        .unwrap();

    assert_eq!(session.find_next(&source), FindOutcome::Found(12));
    assert_eq!(session.find_next(&source), FindOutcome::Found(28));
    assert_eq!(session.find_next(&source), FindOutcome::NotFound);
    assert_eq!(session.cursor(), 28);

    assert_eq!(session.find_previous(&source), FindOutcome::Found(12));
}

#[test]
fn hex_and_text_queries_agree_on_the_same_bytes() {
    let source = sample_buffer();
    let token = CancelToken::new();
    let text = compile("RIFF", FindMode::Text).unwrap();
    let hex = compile("52 49 46 46", FindMode::Hex).unwrap();

    let a = find(&source, &text, Direction::All, 4, true, &token);
    let b = find(&source, &hex, Direction::All, 4, true, &token);
    assert_eq!(a, b);
    assert_eq!(a, FindOutcome::Found(0)); // wrapped around to the header
}
