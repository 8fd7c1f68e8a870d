//! Command handlers, one module per subcommand

pub mod config;
pub mod document;
pub mod history;
pub mod render;
