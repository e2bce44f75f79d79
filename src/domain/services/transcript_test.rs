use super::Transcript;
use super::CURSOR;
use crate::domain::models::Segment;
use crate::domain::models::StreamState;
use crate::domain::models::Turn;

#[test]
fn it_renders_an_empty_history_to_nothing() {
    let lines = Transcript::render(&[], None);
    assert!(lines.is_empty());
}

#[test]
fn it_renders_turns_with_thinking_separated_from_answers() {
    let turns = vec![
        Turn::user("hello"),
        Turn::assistant("the user greeted me", "hi!", "hello"),
    ];

    let lines = Transcript::render(&turns, None);
    assert_eq!(
        lines,
        vec![
            "You: hello".to_string(),
            "[thinking] the user greeted me".to_string(),
            "Assistant: hi!".to_string(),
        ]
    );
}

#[test]
fn it_renders_a_live_placeholder_with_a_cursor() {
    let mut state = StreamState::new();
    state.text = "partial answ".to_string();

    let lines = Transcript::render(&[Turn::user("hello")], Some(&state));
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], format!("Assistant: partial answ{CURSOR}"));
}

#[test]
fn it_marks_a_live_stream_that_is_still_thinking() {
    let mut state = StreamState::new();
    state.segment = Segment::Thinking;
    state.think = "working through it".to_string();

    let lines = Transcript::render(&[], Some(&state));
    assert_eq!(
        lines,
        vec![
            "[thinking] working through it".to_string(),
            format!("Assistant: {CURSOR}"),
        ]
    );
}
