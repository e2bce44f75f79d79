pub mod relay;

mod history;
mod splitter;
mod transcript;

pub use history::*;
pub use splitter::*;
pub use transcript::*;
