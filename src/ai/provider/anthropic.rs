//! Anthropic Messages API Provider
//!
//! Sends the system prompt as the top-level `system` field and the source
//! prompt as a single user turn.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::{
    LlmProvider, LlmResponse, ProviderConfig, ResponseMetadata, ResponseTiming, TokenUsage,
};
use crate::constants::network::CONNECTION_TIMEOUT_SECS;
use crate::types::{AgentError, Result};

const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
const API_VERSION: &str = "2023-06-01";

/// Anthropic API Provider with secure API key handling
pub struct AnthropicProvider {
    api_key: SecretString,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl AnthropicProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key_str = config
            .api_key
            .or_else(|| std::env::var(API_KEY_VAR).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AgentError::Config(format!(
                    "Anthropic API key not found. Set {} env var or llm.api_key in config",
                    API_KEY_VAR
                ))
            })?;

        let api_base = config
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECTION_TIMEOUT_SECS))
            .build()
            .map_err(|e| AgentError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base,
            model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn build_request(&self, system: &str, user: &str) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            system: system.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: user.to_string(),
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn generate(&self, system: &str, user: &str) -> Result<LlmResponse> {
        info!(
            "Generating with Anthropic (model: {}, temperature: {})",
            self.model, self.temperature
        );

        let start_time = Instant::now();
        let request = self.build_request(system, user);
        let url = format!("{}/v1/messages", self.api_base);

        debug!("Sending request to Anthropic API");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::LlmApi(format!("Anthropic request failed: {}", e)))?;

        let elapsed = start_time.elapsed();

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::LlmApi(format!(
                "Anthropic API error ({}): {}",
                status, body
            )));
        }

        let response_body: MessagesResponse = response.json().await.map_err(|e| {
            AgentError::LlmApi(format!("Failed to parse Anthropic response: {}", e))
        })?;

        let usage = response_body
            .usage
            .as_ref()
            .map(|u| TokenUsage::from_anthropic(u.input_tokens, u.output_tokens))
            .unwrap_or_default();

        let content = response_body
            .text()
            .ok_or_else(|| AgentError::LlmApi("No content in Anthropic response".to_string()))?;

        debug!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Received response from Anthropic"
        );

        Ok(LlmResponse::with_metrics(
            content,
            usage,
            ResponseTiming::from_duration(elapsed),
            ResponseMetadata {
                model: self.model.clone(),
                provider: "anthropic".to_string(),
            },
        ))
    }

    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    system: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<UsageInfo>,
}

impl MessagesResponse {
    /// Concatenated text blocks, `None` when the reply has no text
    fn text(&self) -> Option<String> {
        let text: String = self
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    input_tokens: u32,
    output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> AnthropicProvider {
        AnthropicProvider::new(ProviderConfig {
            provider: "anthropic".to_string(),
            model: Some("claude-sonnet-4-20250514".to_string()),
            api_key: Some("sk-ant-test".to_string()),
            ..ProviderConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_request_puts_system_at_top_level() {
        let request = provider().build_request("be precise", "explain this");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["system"], "be precise");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "explain this");
        assert_eq!(json["model"], "claude-sonnet-4-20250514");
        assert_eq!(json["max_tokens"], 4096);
    }

    #[test]
    fn test_default_api_base() {
        assert_eq!(provider().api_base, "https://api.anthropic.com");
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", provider());
        assert!(!debug.contains("sk-ant-test"));
    }

    #[test]
    fn test_parses_messages_body() {
        let body = r##"{"id":"msg_01","type":"message","role":"assistant","content":[{"type":"text","text":"# Overview"},{"type":"text","text":"\nDetails"}],"usage":{"input_tokens":21,"output_tokens":8}}"##;
        let parsed: MessagesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.text().as_deref(), Some("# Overview\nDetails"));
        let usage = parsed.usage.unwrap();
        assert_eq!(TokenUsage::from_anthropic(usage.input_tokens, usage.output_tokens).total(), 29);
    }

    #[test]
    fn test_reply_without_text_has_no_content() {
        let body = r#"{"content":[{"type":"tool_use","id":"t1"}]}"#;
        let parsed: MessagesResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.text().is_none());
    }
}
