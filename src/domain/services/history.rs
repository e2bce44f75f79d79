#[cfg(test)]
#[path = "history_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::Role;
use crate::domain::models::Turn;
use crate::infrastructure::storage::Storage;
use crate::infrastructure::storage::CHAT_HISTORY_KEY;

/// The ordered turn history. Owns the conversation exclusively; everything
/// else reads snapshots. The full history is persisted before any mutating
/// call returns, so a crash never loses an acknowledged turn.
pub struct ChatHistory {
    storage: Storage,
    turns: Vec<Turn>,
}

impl ChatHistory {
    pub async fn load_or_default(storage: Storage) -> Result<ChatHistory> {
        let turns = match storage.get(CHAT_HISTORY_KEY).await? {
            Some(value) => serde_json::from_value(value)?,
            None => vec![],
        };

        return Ok(ChatHistory { storage, turns });
    }

    pub fn turns(&self) -> &[Turn] {
        return &self.turns;
    }

    pub fn last_assistant_turn(&self) -> Option<&Turn> {
        return self
            .turns
            .iter()
            .rev()
            .find(|turn| return turn.role == Role::Assistant);
    }

    pub async fn append(&mut self, turn: Turn) -> Result<()> {
        self.turns.push(turn);
        return self.persist().await;
    }

    /// Records a finalized assistant turn. A turn that produced only thinking
    /// and no answer text is not recorded; returns whether anything was
    /// committed.
    pub async fn commit_assistant_turn(
        &mut self,
        think: &str,
        text: &str,
        prompt: &str,
    ) -> Result<bool> {
        if text.is_empty() {
            return Ok(false);
        }

        self.append(Turn::assistant(think, text, prompt)).await?;
        return Ok(true);
    }

    /// Removes the most recent assistant turn whose text matches exactly.
    /// Regenerate calls this right before re-submitting, so the replaced turn
    /// is not duplicated when the new answer commits.
    pub async fn remove_assistant_turn_by_content(&mut self, text: &str) -> Result<bool> {
        let idx = self
            .turns
            .iter()
            .rposition(|turn| return turn.role == Role::Assistant && turn.text == text);

        if let Some(idx) = idx {
            self.turns.remove(idx);
            self.persist().await?;
            return Ok(true);
        }

        return Ok(false);
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.turns.clear();
        return self.persist().await;
    }

    async fn persist(&self) -> Result<()> {
        return self
            .storage
            .set(CHAT_HISTORY_KEY, serde_json::to_value(&self.turns)?)
            .await;
    }
}
