use super::BackendPrompt;

/// Messages crossing from the panel into the relay context.
pub enum Action {
    CompletionRequest(BackendPrompt),
    GetContext(),
}
