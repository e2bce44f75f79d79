pub mod cli;
pub mod panel;
