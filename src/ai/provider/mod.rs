//! LLM Provider Abstraction
//!
//! Defines the LlmProvider trait for Markdown documentation generation.
//! All providers return `LlmResponse` with token usage metrics for cost tracking.

mod anthropic;
mod gemini;
mod ollama;
mod openai;

#[cfg(test)]
pub mod mock;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::ai::pricing::calculate_cost;
use crate::config::LlmConfig;
use crate::types::{AgentError, Result};

// =============================================================================
// LLM Response with Usage Metrics
// =============================================================================

/// Complete LLM response including content, usage metrics, and estimated cost
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated Markdown
    pub content: String,
    /// Token usage metrics
    pub usage: TokenUsage,
    /// Estimated cost in USD from the pricing table
    pub cost_usd: f64,
    /// Response timing
    pub timing: ResponseTiming,
    /// Provider and model info
    pub metadata: ResponseMetadata,
}

impl LlmResponse {
    /// Create full response, pricing the usage against `metadata.model`
    pub fn with_metrics(
        content: String,
        usage: TokenUsage,
        timing: ResponseTiming,
        metadata: ResponseMetadata,
    ) -> Self {
        let cost_usd = calculate_cost(&metadata.model, usage.input_tokens, usage.output_tokens);
        Self {
            content,
            usage,
            cost_usd,
            timing,
            metadata,
        }
    }
}

/// Token usage metrics for cost tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input tokens (prompt)
    pub input_tokens: u32,
    /// Output tokens (response)
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    /// Create from OpenAI-style usage response
    pub fn from_openai(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            input_tokens: prompt_tokens,
            output_tokens: completion_tokens,
        }
    }

    /// Create from Anthropic-style usage response
    pub fn from_anthropic(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Create from Gemini-style usage metadata
    pub fn from_gemini(prompt_token_count: u32, candidates_token_count: u32) -> Self {
        Self {
            input_tokens: prompt_token_count,
            output_tokens: candidates_token_count,
        }
    }

    /// Create from Ollama-style usage response
    pub fn from_ollama(prompt_eval_count: u32, eval_count: u32) -> Self {
        Self {
            input_tokens: prompt_eval_count,
            output_tokens: eval_count,
        }
    }
}

/// Response timing metrics
#[derive(Debug, Clone, Default)]
pub struct ResponseTiming {
    /// Total response time in milliseconds (wall clock)
    pub total_ms: u64,
}

impl ResponseTiming {
    pub fn from_duration(duration: std::time::Duration) -> Self {
        Self {
            total_ms: duration.as_millis() as u64,
        }
    }
}

/// Response metadata
#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    /// Model used
    pub model: String,
    /// Provider name
    pub provider: String,
}

/// Shared LLM provider type
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for LLM providers
///
/// API keys are never serialized and are redacted in debug output. Each
/// provider converts the key to `SecretString` internally.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type: "openai", "anthropic", "gemini", "ollama"
    pub provider: String,
    /// Model name (provider-specific)
    pub model: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling temperature
    pub temperature: f32,
    /// API key (hosted providers)
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL (for custom endpoints)
    #[serde(default)]
    pub api_base: Option<String>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::from(&LlmConfig::default())
    }
}

impl From<&LlmConfig> for ProviderConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            provider: config.provider.clone(),
            model: Some(config.model.clone()),
            timeout_secs: config.timeout_secs,
            temperature: config.temperature,
            api_key: config.api_key.clone(),
            api_base: config.endpoint.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// LLM Provider trait for free-text generation with usage metrics
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion from a system prompt and a user prompt
    async fn generate(&self, system: &str, user: &str) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Names accepted by [`create_provider`]
pub const SUPPORTED_PROVIDERS: &[&str] = &["openai", "anthropic", "gemini", "ollama"];

impl ProviderConfig {
    /// Provider that will serve this config.
    ///
    /// With the default `openai` provider and no custom endpoint, a `claude-`
    /// model routes to `anthropic` and a `gemini/` or `gemini-` model routes
    /// to `gemini`. An explicit provider name always wins.
    pub fn resolved_provider(&self) -> &str {
        if self.provider == "openai"
            && self.api_base.is_none()
            && let Some(model) = self.model.as_deref()
        {
            if model.starts_with("claude-") {
                return "anthropic";
            }
            if model.starts_with("gemini/") || model.starts_with("gemini-") {
                return "gemini";
            }
        }
        &self.provider
    }
}

/// Create a shared provider from configuration
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    match config.resolved_provider() {
        "openai" => Ok(Arc::new(OpenAiProvider::new(config.clone())?)),
        "anthropic" => Ok(Arc::new(AnthropicProvider::new(config.clone())?)),
        "gemini" => Ok(Arc::new(GeminiProvider::new(config.clone())?)),
        "ollama" => Ok(Arc::new(OllamaProvider::new(config.clone())?)),
        _ => Err(AgentError::Config(format!(
            "Unknown provider: {}. Supported: {}",
            config.provider,
            SUPPORTED_PROVIDERS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage::from_openai(100, 50);
        assert_eq!(usage.total(), 150);
        assert_eq!(TokenUsage::from_ollama(7, 3).total(), 10);
    }

    #[test]
    fn test_with_metrics_prices_known_model() {
        let response = LlmResponse::with_metrics(
            "# Doc".to_string(),
            TokenUsage::from_openai(1000, 1000),
            ResponseTiming::default(),
            ResponseMetadata {
                model: "gpt-4o-mini".to_string(),
                provider: "openai".to_string(),
            },
        );
        assert!((response.cost_usd - 0.00075).abs() < 1e-12);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ProviderConfig {
            api_key: Some("sk-very-secret".to_string()),
            ..ProviderConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let config = ProviderConfig {
            provider: "carrier-pigeon".to_string(),
            ..ProviderConfig::default()
        };
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("Unknown provider: carrier-pigeon"));
    }

    #[test]
    fn test_from_llm_config() {
        let llm = LlmConfig {
            endpoint: Some("http://localhost:8080/v1".to_string()),
            ..LlmConfig::default()
        };
        let config = ProviderConfig::from(&llm);
        assert_eq!(config.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.api_base.as_deref(), Some("http://localhost:8080/v1"));
    }

    fn with_model(provider: &str, model: &str) -> ProviderConfig {
        ProviderConfig {
            provider: provider.to_string(),
            model: Some(model.to_string()),
            api_key: Some("test-key".to_string()),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn test_provider_inferred_from_model_prefix() {
        assert_eq!(
            with_model("openai", "claude-sonnet-4-20250514").resolved_provider(),
            "anthropic"
        );
        assert_eq!(
            with_model("openai", "gemini/gemini-1.5-flash").resolved_provider(),
            "gemini"
        );
        assert_eq!(with_model("openai", "gemini-1.5-pro").resolved_provider(), "gemini");
        assert_eq!(with_model("openai", "gpt-4o").resolved_provider(), "openai");
    }

    #[test]
    fn test_explicit_provider_or_endpoint_wins() {
        assert_eq!(
            with_model("ollama", "claude-lookalike").resolved_provider(),
            "ollama"
        );
        let proxied = ProviderConfig {
            api_base: Some("http://localhost:4000/v1".to_string()),
            ..with_model("openai", "claude-sonnet-4-20250514")
        };
        assert_eq!(proxied.resolved_provider(), "openai");
    }

    #[test]
    fn test_create_provider_by_name_and_prefix() {
        let anthropic = create_provider(&with_model("anthropic", "claude-opus-4-20250514")).unwrap();
        assert_eq!(anthropic.name(), "anthropic");
        assert_eq!(anthropic.model(), "claude-opus-4-20250514");

        let gemini = create_provider(&with_model("openai", "gemini/gemini-1.5-flash")).unwrap();
        assert_eq!(gemini.name(), "gemini");
        assert_eq!(gemini.model(), "gemini/gemini-1.5-flash");
    }

    #[test]
    fn test_gemini_usage_prices_prefixed_model() {
        let response = LlmResponse::with_metrics(
            "# Doc".to_string(),
            TokenUsage::from_gemini(1000, 1000),
            ResponseTiming::default(),
            ResponseMetadata {
                model: "gemini/gemini-1.5-flash".to_string(),
                provider: "gemini".to_string(),
            },
        );
        assert!(response.cost_usd > 0.0);
    }
}
