/// Which side of a think-tag boundary the parser is currently on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    Answering,
    Thinking,
}

/// Transient parsing state for one in-flight assistant turn. `buffer` holds
/// raw text not yet classified, which is at most a partial marker while
/// answering. Reset when a request starts and again when it finalizes.
pub struct StreamState {
    pub buffer: String,
    pub segment: Segment,
    pub think: String,
    pub text: String,
}

impl Default for StreamState {
    fn default() -> StreamState {
        return StreamState::new();
    }
}

impl StreamState {
    pub fn new() -> StreamState {
        return StreamState {
            buffer: "".to_string(),
            segment: Segment::Answering,
            think: "".to_string(),
            text: "".to_string(),
        };
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.segment = Segment::Answering;
        self.think.clear();
        self.text.clear();
    }
}
