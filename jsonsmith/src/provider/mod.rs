//! LLM provider abstraction and the AI gateway implementation

mod gateway;

pub use gateway::GatewayProvider;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when interacting with the AI gateway
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("AI gateway API key is not configured")]
    MissingApiKey,

    #[error("Rate limits exceeded, please try again later.")]
    RateLimited,

    #[error("Payment required, please add funds to your AI gateway workspace.")]
    PaymentRequired,

    #[error("AI gateway error: {status}")]
    Upstream { status: u16, body: String },

    #[error("AI gateway returned no completion")]
    EmptyResponse,
}

/// One system + user exchange sent to the gateway
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub system: String,
    pub prompt: String,
    /// Sampling temperature; the gateway default applies when unset
    pub temperature: Option<f32>,
}

impl LlmRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Completion text plus what the gateway reported about producing it
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub usage: Option<TokenUsage>,
    /// Wall-clock time of the gateway call
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A chat-completion backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Model name reported by the health endpoint
    fn model(&self) -> &str;

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, ProviderError>;
}
