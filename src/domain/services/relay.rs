#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::infrastructure::backends::BackendBox;
use crate::infrastructure::backends::BackendManager;
use crate::infrastructure::contexts::ContextSourceBox;

/// The background owner of the network connection. It holds no conversation
/// state and never writes persisted data; it only turns panel actions into
/// transient events. Completion workers run detached so the relay stays
/// responsive while a stream is in flight.
pub struct RelayService {}

impl RelayService {
    pub async fn start(
        context: ContextSourceBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        return RelayService::run(context, BackendManager::get, tx, rx).await;
    }

    async fn run(
        context: ContextSourceBox,
        backend_factory: fn() -> BackendBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        tracing::debug!(context_source = %context.name(), "relay started");

        loop {
            let action = rx.recv().await;
            if action.is_none() {
                // Panel hung up, nothing left to relay.
                return Ok(());
            }

            match action.unwrap() {
                Action::CompletionRequest(prompt) => {
                    let worker_tx = tx.clone();
                    tokio::spawn(async move {
                        // The backend resolves the server URL at request time,
                        // so a settings change applies to the next prompt.
                        let res = backend_factory().get_completion(prompt, &worker_tx).await;

                        if let Err(err) = res {
                            tracing::error!(error = ?err, "completion worker failed");
                        }
                    });
                }
                Action::GetContext() => {
                    match context.capture().await {
                        Ok(text) => tx.send(Event::ContextReceived(text))?,
                        Err(err) => {
                            tracing::error!(error = ?err, "page context capture failed");
                            tx.send(Event::ContextReceived("".to_string()))?;
                        }
                    };
                }
            }
        }
    }
}
