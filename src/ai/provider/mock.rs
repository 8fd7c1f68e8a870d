//! Scripted provider for pipeline tests

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use super::{LlmProvider, LlmResponse, ResponseMetadata, ResponseTiming, TokenUsage};
use crate::types::{AgentError, Result};

pub struct MockProvider {
    model: String,
    reply: std::result::Result<String, String>,
    usage: TokenUsage,
    calls: AtomicU32,
    last_user_prompt: Mutex<Option<String>>,
}

impl MockProvider {
    /// Always answers with `content`
    pub fn replying(content: &str) -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            reply: Ok(content.to_string()),
            usage: TokenUsage::from_openai(1000, 500),
            calls: AtomicU32::new(0),
            last_user_prompt: Mutex::new(None),
        }
    }

    /// Always fails with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            ..Self::replying("")
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_user_prompt(&self) -> Option<String> {
        self.last_user_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn generate(&self, _system: &str, user: &str) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_user_prompt.lock().unwrap() = Some(user.to_string());

        match &self.reply {
            Ok(content) => Ok(LlmResponse::with_metrics(
                content.clone(),
                self.usage,
                ResponseTiming::default(),
                ResponseMetadata {
                    model: self.model.clone(),
                    provider: "mock".to_string(),
                },
            )),
            Err(message) => Err(AgentError::LlmApi(message.clone())),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
