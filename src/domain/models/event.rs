use super::RequestId;

/// Messages crossing from the relay context back to the panel. Delivery
/// preserves emission order, and a request's chunks always arrive before its
/// stream-end.
pub enum Event {
    StreamChunk(RequestId, String),
    StreamEnd(RequestId),
    PromptError(RequestId, String),
    ContextReceived(String),
}
