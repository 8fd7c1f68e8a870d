//! Unified Error Types
//!
//! `RenderError` is the single failure kind of the PDF renderer. Everything
//! else in the application reports through `AgentError`.

use thiserror::Error;

// =============================================================================
// Render Error
// =============================================================================

/// Any failure while laying out or writing a PDF
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Agent Error
// =============================================================================

#[derive(Debug, Error)]
pub enum AgentError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF error: {0}")]
    Render(#[from] RenderError),

    // -------------------------------------------------------------------------
    // LLM Errors
    // -------------------------------------------------------------------------
    #[error("LLM API error: {0}")]
    LlmApi(String),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("History error: {0}")]
    History(String),
}

pub type Result<T> = std::result::Result<T, AgentError>;

impl AgentError {
    /// Create an LLM API error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::LlmApi(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Wrap the error as a history error prefixed with `context`
    fn history_context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn history_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| AgentError::History(format!("{}: {}", context.into(), e)))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_displays_message() {
        let err = RenderError::new("disk full");
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn test_agent_error_messages() {
        assert_eq!(
            AgentError::llm("timeout").to_string(),
            "LLM API error: timeout"
        );
        assert_eq!(
            AgentError::NotFound("a.sql".into()).to_string(),
            "File not found: a.sql"
        );
        assert_eq!(
            AgentError::config("bad temperature").to_string(),
            "Config error: bad temperature"
        );
    }

    #[test]
    fn test_from_conversions() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(AgentError::from(io), AgentError::Io(_)));

        let render = RenderError::new("bad page");
        let err: AgentError = render.into();
        assert_eq!(err.to_string(), "PDF error: bad page");
    }

    #[test]
    fn test_history_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        let err = result.history_context("append run_history.jsonl").unwrap_err();
        assert_eq!(
            err.to_string(),
            "History error: append run_history.jsonl: gone"
        );
    }
}
