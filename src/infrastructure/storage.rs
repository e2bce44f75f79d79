#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::path;

use anyhow::Result;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

pub const SERVER_URL_KEY: &str = "serverUrl";
pub const CHAT_HISTORY_KEY: &str = "chatHistory";

/// Key-value persistence backed by a single JSON document. Every write
/// replaces the whole document; there are no partial or merge semantics, and
/// the panel context is the only writer.
pub struct Storage {
    pub file_path: path::PathBuf,
}

impl Default for Storage {
    fn default() -> Storage {
        return Storage::new(path::PathBuf::from(Config::get(ConfigKey::StorageFile)));
    }
}

impl Storage {
    pub fn new(file_path: path::PathBuf) -> Storage {
        return Storage { file_path };
    }

    async fn read_document(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        if !self.file_path.exists() {
            return Ok(BTreeMap::new());
        }

        let payload = fs::read_to_string(&self.file_path).await?;
        match serde_json::from_str(&payload) {
            Ok(doc) => return Ok(doc),
            Err(err) => {
                tracing::warn!(error = ?err, "storage document is unreadable, starting from empty");
                return Ok(BTreeMap::new());
            }
        }
    }

    /// Returns `None` when the key has never been written.
    pub async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let doc = self.read_document().await?;
        return Ok(doc.get(key).cloned());
    }

    pub async fn set(&self, key: &str, value: serde_json::Value) -> Result<()> {
        let mut doc = self.read_document().await?;
        doc.insert(key.to_string(), value);

        if let Some(parent) = self.file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let payload = serde_json::to_string_pretty(&doc)?;
        let mut file = fs::File::create(&self.file_path).await?;
        file.write_all(payload.as_bytes()).await?;

        return Ok(());
    }
}
