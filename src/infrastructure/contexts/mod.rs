pub mod file;
pub mod noop;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::ContextSourceName;

pub type ContextSourceBox = Box<dyn ContextSource + Send + Sync>;

/// Stand-in for the active-page extraction boundary. A source captures text
/// that gets injected once into the next outgoing prompt.
#[async_trait]
pub trait ContextSource {
    fn name(&self) -> ContextSourceName;

    async fn capture(&self) -> Result<String>;
}

pub struct ContextSourceManager {}

impl ContextSourceManager {
    pub fn get(name: ContextSourceName) -> ContextSourceBox {
        if name == ContextSourceName::File {
            return Box::<file::FileContext>::default();
        }

        return Box::<noop::NoopContext>::default();
    }
}
