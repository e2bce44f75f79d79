#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use crate::domain::models::Role;
use crate::domain::models::Segment;
use crate::domain::models::StreamState;
use crate::domain::models::Turn;

pub const CURSOR: &str = "▌";

const USER_LABEL: &str = "You";
const ASSISTANT_LABEL: &str = "Assistant";

/// Thin projection from conversation state to display lines. Reads snapshots
/// only; it never mutates the history or the stream state.
pub struct Transcript {}

impl Transcript {
    pub fn render(turns: &[Turn], live: Option<&StreamState>) -> Vec<String> {
        let mut lines: Vec<String> = vec![];

        for turn in turns {
            match turn.role {
                Role::User => lines.push(format!("{USER_LABEL}: {}", turn.text)),
                Role::Assistant => {
                    if !turn.think.is_empty() {
                        lines.push(format!("[thinking] {}", turn.think));
                    }
                    lines.push(format!("{ASSISTANT_LABEL}: {}", turn.text));
                }
            }
        }

        if let Some(state) = live {
            if !state.think.is_empty() || state.segment == Segment::Thinking {
                lines.push(format!("[thinking] {}", state.think));
            }
            lines.push(format!("{ASSISTANT_LABEL}: {}{CURSOR}", state.text));
        }

        return lines;
    }
}
