//! legacydoc - Legacy Code Documentation Agent
//!
//! Sends legacy source files (SQL, Python, C++, DAX) to an LLM, saves the
//! resulting business documentation as Markdown and optionally as a styled
//! PDF, and keeps a run history with token usage and cost.
//!
//! ## Quick Start
//!
//! ```ignore
//! use legacydoc::{ConfigLoader, DocumentationAgent};
//! use legacydoc::ai::{ProviderConfig, create_provider};
//!
//! let config = ConfigLoader::load()?;
//! let provider = create_provider(&ProviderConfig::from(&config.llm))?;
//! let agent = DocumentationAgent::new(provider, config);
//! let outcome = agent.process_file(Path::new("loans.sql"), true).await?;
//! ```
//!
//! ## Modules
//!
//! - [`render`]: Markdown to paginated PDF
//! - [`ai`]: LLM provider abstraction, prompts, pricing
//! - [`source`]: language detection and file discovery
//! - [`history`]: JSON-lines run log with CSV mirror
//! - [`agent`]: the read → generate → save → log pipeline

pub mod agent;
pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod history;
pub mod render;
pub mod source;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use agent::{BatchStats, DocumentationAgent, FileOutcome, SavedPaths};
pub use config::{Config, ConfigLoader};
pub use types::error::{AgentError, RenderError, Result, ResultExt};

pub use ai::{LlmProvider, LlmResponse, SharedProvider, TokenUsage, generate_documentation};
pub use history::{HistorySummary, RunLogger, RunRecord};
pub use render::{RenderOutcome, convert_md_file_to_pdf, markdown_to_pdf, markdown_to_pdf_bytes};
pub use source::{FileScanner, Language, SourceFile, read_code_file};
