/// Tags one in-flight completion request. Stream events carry the id of the
/// request they belong to so consumers can drop events from a superseded
/// request, which has no ordering guarantee against the live one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestId(pub u64);

pub struct BackendPrompt {
    pub id: RequestId,
    pub text: String,
}

impl BackendPrompt {
    pub fn new(id: RequestId, text: &str) -> BackendPrompt {
        return BackendPrompt {
            id,
            text: text.to_string(),
        };
    }

    pub fn append_page_context(&mut self, context: &str) {
        if context.is_empty() {
            return;
        }

        let context_prompt =
            format!("\n\nUse the following content from the active page as context:\n{context}");
        self.text += &context_prompt;
    }
}
