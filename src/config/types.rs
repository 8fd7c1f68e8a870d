//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/legacydoc/) and project (.legacydoc/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::network::DEFAULT_TIMEOUT_SECS;
use crate::types::{AgentError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Report output settings
    pub output: OutputConfig,

    /// Source discovery settings
    pub scan: ScanConfig,

    /// Run history settings
    pub history: HistoryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            output: OutputConfig::default(),
            scan: ScanConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `AgentError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(AgentError::config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(AgentError::config("LLM timeout_secs must be greater than 0"));
        }

        if self.llm.max_tokens == 0 {
            return Err(AgentError::config("LLM max_tokens must be greater than 0"));
        }

        if self.scan.max_file_size == 0 {
            return Err(AgentError::config("Scan max_file_size must be greater than 0"));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (`openai` or `ollama`)
    pub provider: String,

    /// Model name
    pub model: String,

    /// Override for the provider's base URL
    pub endpoint: Option<String>,

    /// API key; falls back to the provider's environment variable
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Temperature for LLM generation
    pub temperature: f32,

    /// Maximum completion tokens
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            endpoint: None,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: 0.2,
            max_tokens: 4096,
        }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving Markdown and PDF reports
    pub dir: PathBuf,

    /// Render a PDF next to every Markdown report
    pub pdf: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            pdf: false,
        }
    }
}

// =============================================================================
// Scan Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Glob patterns to exclude
    pub exclude: Vec<String>,

    /// Maximum file size in bytes
    pub max_file_size: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: vec![
                ".git/**".to_string(),
                "output/**".to_string(),
                "__pycache__/**".to_string(),
                ".venv/**".to_string(),
                "build/**".to_string(),
            ],
            max_file_size: 1_048_576, // 1MB
        }
    }
}

// =============================================================================
// History Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// JSON-lines run log
    pub jsonl_path: PathBuf,

    /// Spreadsheet-friendly CSV mirror
    pub csv_path: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            jsonl_path: PathBuf::from("run_history.jsonl"),
            csv_path: PathBuf::from("run_history.csv"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.output.dir, PathBuf::from("output"));
        assert_eq!(config.history.jsonl_path, PathBuf::from("run_history.jsonl"));
        assert_eq!(config.history.csv_path, PathBuf::from("run_history.csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_temperature() {
        let mut config = Config::default();
        config.llm.temperature = 2.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));

        config.llm.temperature = 2.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_limits() {
        let mut config = Config::default();
        config.llm.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scan.max_file_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.max_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_never_serialized() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }
}
