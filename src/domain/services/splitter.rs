#[cfg(test)]
#[path = "splitter_test.rs"]
mod tests;

use crate::domain::models::Segment;
use crate::domain::models::StreamState;

pub const THINK_OPEN: &str = "<think>";
pub const THINK_CLOSE: &str = "</think>";

/// Incremental separation of think-tagged reasoning from answer text. The
/// splitter holds no state of its own; everything lives in the `StreamState`
/// it is handed, so one in-flight turn can be parsed in isolation.
///
/// Chunk boundaries are arbitrary. A marker split across two chunks stays in
/// the buffer until the next chunk completes it, so the final classification
/// never depends on how the stream was chunked.
pub struct TagSplitter {}

impl TagSplitter {
    /// Feeds one unit of newly arrived text and classifies as much of the
    /// buffer as possible.
    pub fn push(state: &mut StreamState, chunk: &str) {
        state.buffer.push_str(chunk);
        TagSplitter::drain(state);
    }

    /// Stream-end policy: whatever is left in the buffer belongs to the
    /// segment that was open when the stream closed. An unterminated think
    /// segment flushes to the think accumulator, never to the answer.
    pub fn finalize(state: &mut StreamState) {
        TagSplitter::drain(state);

        if !state.buffer.is_empty() {
            let remainder = std::mem::take(&mut state.buffer);
            match state.segment {
                Segment::Answering => state.text.push_str(&remainder),
                Segment::Thinking => state.think.push_str(&remainder),
            }
        }
    }

    fn drain(state: &mut StreamState) {
        loop {
            let (marker, next_segment) = match state.segment {
                Segment::Answering => (THINK_OPEN, Segment::Thinking),
                Segment::Thinking => (THINK_CLOSE, Segment::Answering),
            };

            if let Some(idx) = state.buffer.find(marker) {
                let committed: String = state.buffer.drain(..idx).collect();
                state.buffer.drain(..marker.len());
                match state.segment {
                    Segment::Answering => state.text.push_str(&committed),
                    Segment::Thinking => state.think.push_str(&committed),
                }

                // A single chunk may carry several complete tag pairs.
                state.segment = next_segment;
                continue;
            }

            // No full marker yet. Everything except a trailing partial marker
            // is final for this segment and can be committed immediately,
            // which keeps the live answer streaming instead of stalling until
            // the next tag.
            let held_back = partial_marker_len(&state.buffer, marker);
            let cutoff = state.buffer.len() - held_back;
            if cutoff > 0 {
                let committed: String = state.buffer.drain(..cutoff).collect();
                match state.segment {
                    Segment::Answering => state.text.push_str(&committed),
                    Segment::Thinking => state.think.push_str(&committed),
                }
            }

            return;
        }
    }
}

/// Length of the longest buffer suffix that is a prefix of `marker`. That
/// suffix may become a marker once more text arrives, so it must be carried
/// forward untouched.
fn partial_marker_len(buffer: &str, marker: &str) -> usize {
    let max = marker.len().min(buffer.len());
    for len in (1..=max).rev() {
        let start = buffer.len() - len;
        if buffer.is_char_boundary(start) && marker.starts_with(&buffer[start..]) {
            return len;
        }
    }

    return 0;
}
