//! AI Integration Layer
//!
//! Prompt construction, model pricing and the provider abstraction used to
//! turn one source file into a Markdown report.

pub mod pricing;
pub mod prompt;
pub mod provider;

pub use pricing::calculate_cost;
pub use provider::{
    LlmProvider, LlmResponse, ProviderConfig, ResponseMetadata, ResponseTiming, SharedProvider,
    TokenUsage, create_provider,
};

use serde::Serialize;
use tracing::{info, warn};

use crate::source::SourceFile;

/// Outcome of one documentation request
#[derive(Debug, Clone, Serialize)]
pub struct DocumentationResult {
    pub success: bool,
    pub documentation: Option<String>,
    pub error: Option<String>,
    pub model_used: String,
    pub usage: TokenUsage,
    pub estimated_cost: f64,
}

impl DocumentationResult {
    fn failed(model: &str, error: String) -> Self {
        Self {
            success: false,
            documentation: None,
            error: Some(error),
            model_used: model.to_string(),
            usage: TokenUsage::default(),
            estimated_cost: 0.0,
        }
    }
}

/// Ask the provider to document `source`.
///
/// Never returns an error: provider failures are captured in the result as
/// `LLM API error: <reason>`.
pub async fn generate_documentation(
    provider: &dyn LlmProvider,
    source: &SourceFile,
) -> DocumentationResult {
    let user = prompt::user_prompt(source.language.as_str(), &source.filename, &source.content);

    match provider.generate(prompt::SYSTEM_PROMPT, &user).await {
        Ok(response) => {
            info!(
                file = %source.filename,
                model = %provider.model(),
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                duration_ms = response.timing.total_ms,
                "Documentation generated"
            );
            DocumentationResult {
                success: true,
                documentation: Some(response.content),
                error: None,
                model_used: provider.model().to_string(),
                usage: response.usage,
                estimated_cost: response.cost_usd,
            }
        }
        Err(e) => {
            let reason = match e {
                crate::types::AgentError::LlmApi(message) => message,
                other => other.to_string(),
            };
            warn!(file = %source.filename, error = %reason, "Documentation request failed");
            DocumentationResult::failed(provider.model(), format!("LLM API error: {}", reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::mock::MockProvider;
    use crate::source::Language;
    use std::path::PathBuf;

    fn source() -> SourceFile {
        SourceFile {
            path: PathBuf::from("loans.sql"),
            filename: "loans.sql".to_string(),
            language: Language::Sql,
            content: "SELECT member_id FROM loans;".to_string(),
        }
    }

    #[tokio::test]
    async fn test_success_carries_usage_and_cost() {
        let provider = MockProvider::replying("# Loans\n\n## 1. Overview\nLists loans.");
        let result = generate_documentation(&provider, &source()).await;

        assert!(result.success);
        assert!(result.error.is_none());
        assert_eq!(result.model_used, "gpt-4o-mini");
        assert_eq!(result.usage.total(), 1500);
        // 1000 in, 500 out at gpt-4o-mini rates
        assert!((result.estimated_cost - 0.00045).abs() < 1e-12);
        assert!(result.documentation.unwrap().starts_with("# Loans"));
    }

    #[tokio::test]
    async fn test_prompt_includes_source() {
        let provider = MockProvider::replying("ok");
        generate_documentation(&provider, &source()).await;

        let prompt = provider.last_user_prompt().unwrap();
        assert!(prompt.contains("**File Name:** loans.sql"));
        assert!(prompt.contains("```SQL\nSELECT member_id FROM loans;\n```"));
    }

    #[tokio::test]
    async fn test_failure_is_captured() {
        let provider = MockProvider::failing("quota exhausted");
        let result = generate_documentation(&provider, &source()).await;

        assert!(!result.success);
        assert!(result.documentation.is_none());
        assert_eq!(result.error.as_deref(), Some("LLM API error: quota exhausted"));
        assert_eq!(result.usage.total(), 0);
        assert_eq!(result.estimated_cost, 0.0);
        assert_eq!(provider.calls(), 1);
    }
}
