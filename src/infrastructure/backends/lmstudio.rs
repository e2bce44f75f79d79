#[cfg(test)]
#[path = "lmstudio_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use futures::StreamExt;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendPrompt;
use crate::domain::models::Event;
use crate::domain::models::RequestId;
use crate::infrastructure::backends::Backend;
use crate::infrastructure::sse::SseFrameDecoder;

const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant. Wrap any internal reasoning in <think> and </think> tags before writing your final answer.";

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct MessageRequest {
    role: String,
    content: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<MessageRequest>,
    temperature: f32,
    stream: bool,
}

/// One request/response cycle against an OpenAI-compatible chat-completions
/// server such as LM Studio.
pub struct LMStudio {
    url: String,
}

impl Default for LMStudio {
    fn default() -> LMStudio {
        return LMStudio {
            url: Config::get(ConfigKey::ServerUrl),
        };
    }
}

impl LMStudio {
    async fn stream_completion<'a>(
        &self,
        req: &CompletionRequest,
        id: RequestId,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<()> {
        let res = reqwest::Client::new()
            .post(format!("{url}/v1/chat/completions", url = self.url))
            .json(req)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "completion request was refused"
            );
            bail!(
                "completion request returned status {}",
                res.status().as_u16()
            );
        }

        let mut decoder = SseFrameDecoder::new();
        let mut stream = res.bytes_stream();
        while let Some(bytes) = stream.next().await {
            // Past [DONE] the transport is only drained until the server
            // closes it.
            if decoder.is_done() {
                continue;
            }

            for delta in decoder.push(&bytes?) {
                tx.send(Event::StreamChunk(id, delta))?;
            }
        }

        return Ok(());
    }
}

#[async_trait]
impl Backend for LMStudio {
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("Server URL is not defined");
        }

        let res = reqwest::Client::new().get(&self.url).send().await;
        if res.is_err() {
            tracing::error!(error = ?res.unwrap_err(), "server is not reachable");
            bail!("Server at {} is not reachable", self.url);
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn get_completion<'a>(
        &self,
        prompt: BackendPrompt,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<()> {
        let req = CompletionRequest {
            model: Config::get(ConfigKey::Model),
            messages: vec![
                MessageRequest {
                    role: "system".to_string(),
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                MessageRequest {
                    role: "user".to_string(),
                    content: prompt.text.clone(),
                },
            ],
            temperature: 0.7,
            stream: true,
        };

        let res = self.stream_completion(&req, prompt.id, tx).await;
        if let Err(err) = res {
            tracing::error!(error = ?err, url = self.url, "completion transport failed");
            tx.send(Event::PromptError(
                prompt.id,
                format!(
                    "Could not connect to the server at {url}. Check the configured server URL.",
                    url = self.url
                ),
            ))?;
        }

        // Terminal event on every path, success or failure.
        tx.send(Event::StreamEnd(prompt.id))?;

        return Ok(());
    }
}
