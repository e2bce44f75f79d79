use anyhow::Result;

use super::CompletionChoiceResponse;
use super::CompletionDeltaResponse;
use super::CompletionResponse;
use super::SseFrameDecoder;

fn frame(content: &str) -> Result<String> {
    let body = serde_json::to_string(&CompletionResponse {
        choices: vec![CompletionChoiceResponse {
            delta: CompletionDeltaResponse {
                content: Some(content.to_string()),
            },
        }],
    })?;

    return Ok(format!("data: {body}\n\n"));
}

#[test]
fn it_emits_one_delta_then_stops_on_done() -> Result<()> {
    let mut decoder = SseFrameDecoder::new();

    let deltas = decoder.push(format!("{}data: [DONE]\n\n", frame("Hi")?).as_bytes());
    assert_eq!(deltas, vec!["Hi".to_string()]);
    assert!(decoder.is_done());

    return Ok(());
}

#[test]
fn it_ignores_frames_arriving_after_done() -> Result<()> {
    let mut decoder = SseFrameDecoder::new();
    decoder.push(b"data: [DONE]\n\n");

    let deltas = decoder.push(frame("late")?.as_bytes());
    assert!(deltas.is_empty());

    return Ok(());
}

#[test]
fn it_skips_malformed_frames_without_aborting() -> Result<()> {
    let mut decoder = SseFrameDecoder::new();

    let body = format!("data: {{not valid json\n\n{}", frame("Hi")?);
    let deltas = decoder.push(body.as_bytes());
    assert_eq!(deltas, vec!["Hi".to_string()]);

    return Ok(());
}

#[test]
fn it_carries_a_partial_frame_across_chunk_boundaries() -> Result<()> {
    let full = frame("split me")?;
    let (head, tail) = full.split_at(12);

    let mut decoder = SseFrameDecoder::new();
    assert!(decoder.push(head.as_bytes()).is_empty());

    let deltas = decoder.push(tail.as_bytes());
    assert_eq!(deltas, vec!["split me".to_string()]);

    return Ok(());
}

#[test]
fn it_reassembles_multibyte_characters_split_across_chunks() -> Result<()> {
    let full = frame("héllo")?;
    let bytes = full.as_bytes();
    // Cut inside the two-byte encoding of 'é'.
    let split = full.find('é').unwrap() + 1;

    let mut decoder = SseFrameDecoder::new();
    assert!(decoder.push(&bytes[..split]).is_empty());

    let deltas = decoder.push(&bytes[split..]);
    assert_eq!(deltas, vec!["héllo".to_string()]);

    return Ok(());
}

#[test]
fn it_decodes_multiple_frames_from_one_chunk() -> Result<()> {
    let mut decoder = SseFrameDecoder::new();

    let deltas = decoder.push(format!("{}{}", frame("Hello ")?, frame("World")?).as_bytes());
    assert_eq!(deltas, vec!["Hello ".to_string(), "World".to_string()]);

    return Ok(());
}

#[test]
fn it_treats_missing_content_as_no_delta() {
    let mut decoder = SseFrameDecoder::new();

    let deltas = decoder.push(b"data: {\"choices\":[{\"delta\":{}}]}\n\n");
    assert!(deltas.is_empty());
    assert!(!decoder.is_done());
}

#[test]
fn it_skips_frames_without_the_data_prefix() -> Result<()> {
    let mut decoder = SseFrameDecoder::new();

    let deltas = decoder.push(format!(": keep-alive\n\n{}", frame("Hi")?).as_bytes());
    assert_eq!(deltas, vec!["Hi".to_string()]);

    return Ok(());
}
