pub mod lmstudio;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::models::BackendPrompt;
use crate::domain::models::Event;

pub type BackendBox = Box<dyn Backend + Send + Sync>;

#[async_trait]
pub trait Backend {
    /// Used at startup to verify the configured server is reachable before
    /// the first prompt goes out.
    async fn health_check(&self) -> Result<()>;

    /// Runs one completion request. Content deltas are streamed back through
    /// the channel as stream-chunk events, raw and unclassified; think-tag
    /// splitting happens on the panel side.
    ///
    /// Every path, success or failure, ends with exactly one stream-end
    /// event. Consumers rely on it as the sole signal that the turn is no
    /// longer in flight.
    async fn get_completion<'a>(
        &self,
        prompt: BackendPrompt,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<()>;
}

pub struct BackendManager {}

impl BackendManager {
    pub fn get() -> BackendBox {
        return Box::<lmstudio::LMStudio>::default();
    }
}
