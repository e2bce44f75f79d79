use std::env;

use anyhow::Result;
use uuid::Uuid;

use super::Panel;
use crate::domain::models::Event;
use crate::domain::models::RequestId;
use crate::domain::models::Role;
use crate::domain::services::ChatHistory;
use crate::infrastructure::storage::Storage;

fn temp_path() -> std::path::PathBuf {
    return env::temp_dir().join(format!("sidellm-panel-test-{}.json", Uuid::new_v4()));
}

async fn fixture() -> Result<Panel> {
    let path = temp_path();
    let history = ChatHistory::load_or_default(Storage::new(path.clone())).await?;
    return Ok(Panel::new(history, Storage::new(path)));
}

async fn stream_answer(panel: &mut Panel, id: RequestId, chunks: &[&str]) -> Result<()> {
    for chunk in chunks {
        panel
            .handle_event(Event::StreamChunk(id, chunk.to_string()))
            .await?;
    }
    panel.handle_event(Event::StreamEnd(id)).await?;

    return Ok(());
}

#[tokio::test]
async fn it_commits_a_streamed_turn_with_thinking_separated() -> Result<()> {
    let mut panel = fixture().await?;

    let prompt = panel.submit("why is the sky blue?").await?;
    assert!(panel.is_streaming());

    stream_answer(
        &mut panel,
        prompt.id,
        &["<think>scatter", "ing</think>", "Rayleigh scattering."],
    )
    .await?;

    assert!(!panel.is_streaming());
    assert_eq!(panel.turns().len(), 2);

    let answer = &panel.turns()[1];
    assert_eq!(answer.role, Role::Assistant);
    assert_eq!(answer.think, "scattering");
    assert_eq!(answer.text, "Rayleigh scattering.");
    assert_eq!(answer.prompt, "why is the sky blue?");

    return Ok(());
}

#[tokio::test]
async fn it_streams_only_answer_text_to_the_caller() -> Result<()> {
    let mut panel = fixture().await?;
    let prompt = panel.submit("hello").await?;

    let hidden = panel
        .handle_event(Event::StreamChunk(prompt.id, "<think>internal</think>".to_string()))
        .await?;
    assert!(hidden.is_none());

    let shown = panel
        .handle_event(Event::StreamChunk(prompt.id, "hi!".to_string()))
        .await?;
    assert_eq!(shown, Some("hi!".to_string()));

    return Ok(());
}

#[tokio::test]
async fn it_commits_nothing_for_think_only_streams() -> Result<()> {
    let mut panel = fixture().await?;

    let prompt = panel.submit("hmm").await?;
    stream_answer(&mut panel, prompt.id, &["<think>no answer today</think>"]).await?;

    assert_eq!(panel.turns().len(), 1);
    assert_eq!(panel.turns()[0].role, Role::User);

    return Ok(());
}

#[tokio::test]
async fn it_discards_events_from_superseded_requests() -> Result<()> {
    let mut panel = fixture().await?;

    let first = panel.submit("first question").await?;
    let second = panel.submit("second question").await?;

    // The first stream is still running server-side; its events must not
    // touch the live placeholder.
    let res = panel
        .handle_event(Event::StreamChunk(first.id, "stale text".to_string()))
        .await?;
    assert!(res.is_none());

    panel.handle_event(Event::StreamEnd(first.id)).await?;
    assert!(panel.is_streaming());

    stream_answer(&mut panel, second.id, &["fresh text"]).await?;

    assert_eq!(panel.turns().len(), 3);
    assert_eq!(panel.turns()[2].text, "fresh text");

    return Ok(());
}

#[tokio::test]
async fn it_regenerates_a_turn_in_place() -> Result<()> {
    let mut panel = fixture().await?;

    let prompt = panel.submit("tell me a joke").await?;
    stream_answer(&mut panel, prompt.id, &["the first joke"]).await?;
    assert_eq!(panel.turns().len(), 2);

    let redo = panel.regenerate().await?.unwrap();
    assert_eq!(redo.text, "tell me a joke");
    assert_ne!(redo.id, prompt.id);
    assert_eq!(panel.turns().len(), 1);

    stream_answer(&mut panel, redo.id, &["a better joke"]).await?;

    assert_eq!(panel.turns().len(), 2);
    assert_eq!(panel.turns()[1].text, "a better joke");
    assert_eq!(panel.turns()[1].prompt, "tell me a joke");

    return Ok(());
}

#[tokio::test]
async fn it_has_nothing_to_regenerate_on_a_fresh_panel() -> Result<()> {
    let mut panel = fixture().await?;
    assert!(panel.regenerate().await?.is_none());

    return Ok(());
}

#[tokio::test]
async fn it_does_not_commit_text_streamed_before_a_transport_failure() -> Result<()> {
    let mut panel = fixture().await?;

    let prompt = panel.submit("hello").await?;
    panel
        .handle_event(Event::StreamChunk(prompt.id, "partial ans".to_string()))
        .await?;

    let shown = panel
        .handle_event(Event::PromptError(prompt.id, "server went away".to_string()))
        .await?;
    assert!(shown.unwrap().contains("server went away"));

    panel.handle_event(Event::StreamEnd(prompt.id)).await?;

    assert!(!panel.is_streaming());
    assert_eq!(panel.turns().len(), 1);
    assert_eq!(panel.turns()[0].role, Role::User);

    return Ok(());
}

#[tokio::test]
async fn it_requires_confirmation_to_clear_history() -> Result<()> {
    let mut panel = fixture().await?;

    let prompt = panel.submit("remember this").await?;
    stream_answer(&mut panel, prompt.id, &["noted"]).await?;

    let denied = panel.clear_history(false).await?;
    assert!(!denied);
    assert_eq!(panel.turns().len(), 2);

    let confirmed = panel.clear_history(true).await?;
    assert!(confirmed);
    assert!(panel.turns().is_empty());

    return Ok(());
}

#[tokio::test]
async fn it_attaches_page_context_to_exactly_one_prompt() -> Result<()> {
    let mut panel = fixture().await?;

    panel
        .handle_event(Event::ContextReceived("the page talks about crabs".to_string()))
        .await?;

    let first = panel.submit("summarize this").await?;
    assert!(first.text.contains("the page talks about crabs"));
    assert_eq!(panel.turns()[0].text, "summarize this");

    let second = panel.submit("and now?").await?;
    assert!(!second.text.contains("the page talks about crabs"));

    return Ok(());
}

#[tokio::test]
async fn it_keeps_the_context_laden_prompt_for_regeneration() -> Result<()> {
    let mut panel = fixture().await?;

    panel
        .handle_event(Event::ContextReceived("important context".to_string()))
        .await?;

    let prompt = panel.submit("what does it say?").await?;
    stream_answer(&mut panel, prompt.id, &["it says things"]).await?;

    let redo = panel.regenerate().await?.unwrap();
    assert!(redo.text.contains("important context"));

    return Ok(());
}
