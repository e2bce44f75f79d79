#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ContextSourceName;
use crate::infrastructure::contexts::ContextSource;

/// Reads context from a file on disk, standing in for the page the user is
/// looking at.
#[derive(Default)]
pub struct FileContext {}

#[async_trait]
impl ContextSource for FileContext {
    fn name(&self) -> ContextSourceName {
        return ContextSourceName::File;
    }

    #[allow(clippy::implicit_return)]
    async fn capture(&self) -> Result<String> {
        let path = Config::get(ConfigKey::ContextFile);
        if path.is_empty() {
            bail!("context-file is not configured");
        }

        return read_context_file(&path).await;
    }
}

async fn read_context_file(path: &str) -> Result<String> {
    let text = fs::read_to_string(path).await?;
    return Ok(text.trim().to_string());
}
