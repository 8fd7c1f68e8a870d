//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/legacydoc/config.toml)
//! 3. Project config (.legacydoc/config.toml)
//! 4. Environment variables (DEFAULT_MODEL, LEGACYDOC_*)
//! 5. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
