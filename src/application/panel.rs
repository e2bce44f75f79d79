#[cfg(test)]
#[path = "panel_test.rs"]
mod tests;

use std::io::Write;

use anyhow::Result;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::BackendPrompt;
use crate::domain::models::Event;
use crate::domain::models::RequestId;
use crate::domain::models::StreamState;
use crate::domain::models::Turn;
use crate::domain::services::ChatHistory;
use crate::domain::services::TagSplitter;
use crate::domain::services::Transcript;
use crate::infrastructure::backends::BackendManager;
use crate::infrastructure::storage::Storage;
use crate::infrastructure::storage::SERVER_URL_KEY;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /regenerate (/r) - Discards the last answer and asks again with the same prompt.
- /context - Captures page context and attaches it to your next prompt.
- /server [URL] - Shows or updates the server URL. Saved for future sessions.
- /clear - Deletes the whole conversation. Asks for confirmation first.
- /help (/h) - Provides this help menu.
- /quit /exit (/q) - Exit sidellm.

Anything else you type is sent to the model as a prompt.
        "#;

    return text.trim().to_string();
}

/// The UI-side half of the conversation. Owns the history, the stream state
/// for the one in-flight turn, and the single-use pending page context. The
/// relay context never touches any of this; it only sends events.
pub struct Panel {
    history: ChatHistory,
    storage: Storage,
    stream: StreamState,
    live_request: Option<RequestId>,
    live_prompt: String,
    next_request_id: u64,
    pending_context: Option<String>,
}

impl Panel {
    pub fn new(history: ChatHistory, storage: Storage) -> Panel {
        return Panel {
            history,
            storage,
            stream: StreamState::new(),
            live_request: None,
            live_prompt: "".to_string(),
            next_request_id: 0,
            pending_context: None,
        };
    }

    pub fn turns(&self) -> &[Turn] {
        return self.history.turns();
    }

    pub fn is_streaming(&self) -> bool {
        return self.live_request.is_some();
    }

    fn allocate_request_id(&mut self) -> RequestId {
        self.next_request_id += 1;
        return RequestId(self.next_request_id);
    }

    fn begin_stream(&mut self, id: RequestId, prompt_text: &str) {
        self.stream.reset();
        self.live_request = Some(id);
        self.live_prompt = prompt_text.to_string();
    }

    /// Appends the user turn and returns the prompt to hand to the relay. Any
    /// pending page context is attached here and consumed; the stored user
    /// turn keeps only what the user typed.
    pub async fn submit(&mut self, text: &str) -> Result<BackendPrompt> {
        let mut prompt = BackendPrompt::new(self.allocate_request_id(), text);
        if let Some(context) = self.pending_context.take() {
            prompt.append_page_context(&context);
        }

        self.history.append(Turn::user(text)).await?;
        self.begin_stream(prompt.id, &prompt.text);

        return Ok(prompt);
    }

    /// Rolls back the last assistant turn and re-submits the exact prompt
    /// that produced it. Returns None when there is nothing to regenerate.
    /// Events still arriving for the superseded stream fail the RequestId
    /// check and are dropped.
    pub async fn regenerate(&mut self) -> Result<Option<BackendPrompt>> {
        let target = match self.history.last_assistant_turn() {
            None => return Ok(None),
            Some(turn) => (turn.text.clone(), turn.prompt.clone()),
        };

        self.history.remove_assistant_turn_by_content(&target.0).await?;

        let prompt = BackendPrompt::new(self.allocate_request_id(), &target.1);
        self.begin_stream(prompt.id, &prompt.text);

        return Ok(Some(prompt));
    }

    /// Destructive and gated: callers must pass an explicit confirmation.
    /// Denial leaves the history untouched.
    pub async fn clear_history(&mut self, confirmed: bool) -> Result<bool> {
        if !confirmed {
            return Ok(false);
        }

        self.history.clear().await?;
        return Ok(true);
    }

    pub async fn set_server_url(&mut self, url: &str) -> Result<()> {
        Config::set(ConfigKey::ServerUrl, url);
        return self
            .storage
            .set(SERVER_URL_KEY, serde_json::Value::String(url.to_string()))
            .await;
    }

    /// Applies one relay event. Returns text for the caller to print, if any.
    /// Events tagged with a request id other than the live one belong to a
    /// superseded stream and are discarded.
    pub async fn handle_event(&mut self, event: Event) -> Result<Option<String>> {
        match event {
            Event::StreamChunk(id, delta) => {
                if self.live_request != Some(id) {
                    return Ok(None);
                }

                let shown = self.stream.text.len();
                TagSplitter::push(&mut self.stream, &delta);

                let suffix = self.stream.text[shown..].to_string();
                if suffix.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(suffix));
            }
            Event::StreamEnd(id) => {
                if self.live_request != Some(id) {
                    return Ok(None);
                }

                TagSplitter::finalize(&mut self.stream);
                let committed = self
                    .history
                    .commit_assistant_turn(
                        &self.stream.think,
                        &self.stream.text,
                        &self.live_prompt,
                    )
                    .await?;
                if !committed {
                    tracing::debug!("assistant turn had no answer text, nothing recorded");
                }

                self.live_request = None;
                self.stream.reset();
                return Ok(Some("\n".to_string()));
            }
            Event::PromptError(id, message) => {
                if self.live_request != Some(id) {
                    return Ok(None);
                }

                // Text accumulated before the failure belongs to a broken
                // turn; dropping it here keeps the stream-end that follows
                // from committing a half answer.
                self.stream.reset();
                return Ok(Some(format!("\nerror: {message}")));
            }
            Event::ContextReceived(text) => {
                if text.is_empty() {
                    return Ok(None);
                }

                self.pending_context = Some(text);
                return Ok(Some(
                    "Page context attached to your next prompt.".to_string(),
                ));
            }
        }
    }
}

fn print_inline(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

async fn handle_input(
    panel: &mut Panel,
    action_tx: &mpsc::UnboundedSender<Action>,
    input: &str,
) -> Result<bool> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(true);
    }

    match input {
        "/quit" | "/exit" | "/q" => {
            return Ok(false);
        }
        "/help" | "/h" => {
            println!("{}", help_text());
        }
        "/clear" => {
            println!("This deletes the whole conversation. Type '/clear confirm' to proceed.");
        }
        "/clear confirm" => {
            panel.clear_history(true).await?;
            println!("Conversation cleared.");
        }
        "/context" => {
            action_tx.send(Action::GetContext())?;
        }
        "/server" => {
            println!("Server URL: {}", Config::get(ConfigKey::ServerUrl));
        }
        "/regenerate" | "/r" => {
            if panel.is_streaming() {
                println!("An answer is still streaming. Wait for it to finish first.");
                return Ok(true);
            }

            match panel.regenerate().await? {
                None => println!("There is no answer to regenerate yet."),
                Some(prompt) => {
                    action_tx.send(Action::CompletionRequest(prompt))?;
                    print_inline("Assistant: ");
                }
            };
        }
        _ => {
            if let Some(url) = input.strip_prefix("/server ") {
                panel.set_server_url(url.trim()).await?;
                println!("Saved!");
                return Ok(true);
            }
            if input.starts_with('/') {
                println!("Unknown command. Use /help to list commands.");
                return Ok(true);
            }

            let prompt = panel.submit(input).await?;
            action_tx.send(Action::CompletionRequest(prompt))?;
            print_inline("Assistant: ");
        }
    }

    return Ok(true);
}

pub async fn start(
    action_tx: mpsc::UnboundedSender<Action>,
    mut event_rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let storage = Storage::default();

    // A server URL saved from a previous session wins over the compiled-in
    // default, but not over an explicit flag or config file entry.
    if Config::get(ConfigKey::ServerUrl) == Config::default(ConfigKey::ServerUrl) {
        if let Some(value) = storage.get(SERVER_URL_KEY).await? {
            if let Some(url) = value.as_str() {
                Config::set(ConfigKey::ServerUrl, url);
            }
        }
    }

    let history = ChatHistory::load_or_default(Storage::default()).await?;
    let mut panel = Panel::new(history, storage);

    if let Err(err) = BackendManager::get().health_check().await {
        println!("{err}. Prompts will fail until it is. Use '/server [URL]' to change the server URL.");
    }

    for line in Transcript::render(panel.turns(), None) {
        println!("{line}");
    }

    let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = stdin_lines.next_line() => {
                match line? {
                    None => return Ok(()),
                    Some(input) => {
                        if !handle_input(&mut panel, &action_tx, &input).await? {
                            return Ok(());
                        }
                    }
                }
            }
            event = event_rx.recv() => {
                match event {
                    None => return Ok(()),
                    Some(event) => {
                        if let Some(output) = panel.handle_event(event).await? {
                            print_inline(&output);
                        }
                    }
                }
            }
        }
    }
}
