#[cfg(test)]
#[path = "sse_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

const FRAME_DELIMITER: &[u8] = b"\n\n";
const DATA_PREFIX: &str = "data:";
const DONE_SENTINEL: &str = "[DONE]";

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionDeltaResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionChoiceResponse {
    #[serde(default)]
    pub delta: CompletionDeltaResponse,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoiceResponse>,
}

/// Turns raw byte chunks of a chat-completions event stream into content
/// deltas. Frames are `data: <json>` blocks separated by a blank line; the
/// `[DONE]` sentinel latches the decoder so later frames are ignored while
/// the caller drains the transport until it closes.
///
/// A chunk boundary can land anywhere, including mid-frame or inside a
/// multibyte character. The trailing bytes without a delimiter are an
/// incomplete frame and stay buffered until the next chunk completes it;
/// conversion to text happens per complete frame, never per chunk.
pub struct SseFrameDecoder {
    buffer: Vec<u8>,
    done: bool,
}

impl Default for SseFrameDecoder {
    fn default() -> SseFrameDecoder {
        return SseFrameDecoder::new();
    }
}

impl SseFrameDecoder {
    pub fn new() -> SseFrameDecoder {
        return SseFrameDecoder {
            buffer: vec![],
            done: false,
        };
    }

    pub fn is_done(&self) -> bool {
        return self.done;
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut deltas: Vec<String> = vec![];
        if self.done {
            return deltas;
        }

        self.buffer.extend_from_slice(chunk);
        while let Some(idx) = find_frame_delimiter(&self.buffer) {
            let frame_bytes = self
                .buffer
                .drain(..idx + FRAME_DELIMITER.len())
                .collect::<Vec<u8>>();

            let frame = String::from_utf8_lossy(&frame_bytes).to_string();
            if let Some(delta) = self.decode_frame(frame.trim()) {
                deltas.push(delta);
            }
            if self.done {
                break;
            }
        }

        return deltas;
    }

    fn decode_frame(&mut self, frame: &str) -> Option<String> {
        // Frames without the data field prefix (comments, keep-alives) carry
        // no payload.
        let payload = frame.strip_prefix(DATA_PREFIX)?.trim();
        if payload == DONE_SENTINEL {
            self.done = true;
            return None;
        }

        match serde_json::from_str::<CompletionResponse>(payload) {
            Ok(res) => {
                tracing::debug!(body = ?res, "completion frame");
                let content = res.choices.first()?.delta.content.clone()?;
                if content.is_empty() {
                    return None;
                }
                return Some(content);
            }
            Err(err) => {
                // One bad frame must not abort the stream.
                tracing::warn!(error = ?err, frame = payload, "skipping malformed stream frame");
                return None;
            }
        }
    }
}

fn find_frame_delimiter(buffer: &[u8]) -> Option<usize> {
    return buffer
        .windows(FRAME_DELIMITER.len())
        .position(|window| return window == FRAME_DELIMITER);
}
