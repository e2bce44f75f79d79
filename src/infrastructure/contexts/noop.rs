#[cfg(test)]
#[path = "noop_test.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::ContextSourceName;
use crate::infrastructure::contexts::ContextSource;

#[derive(Default)]
pub struct NoopContext {}

#[async_trait]
impl ContextSource for NoopContext {
    fn name(&self) -> ContextSourceName {
        return ContextSourceName::None;
    }

    #[allow(clippy::implicit_return)]
    async fn capture(&self) -> Result<String> {
        return Ok("".to_string());
    }
}
