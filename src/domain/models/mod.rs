mod action;
mod context;
mod event;
mod prompt;
mod stream;
mod turn;

pub use action::*;
pub use context::*;
pub use event::*;
pub use prompt::*;
pub use stream::*;
pub use turn::*;
