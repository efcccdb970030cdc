//! AI gateway provider implementation
//!
//! Talks to an OpenAI-compatible chat completions endpoint.
//!
//! Configuration:
//! - base_url: gateway URL including the API version (default: https://ai.gateway.lovable.dev/v1)
//! - api_key: sent as a bearer token; requests fail with `MissingApiKey` when absent
//! - model: model name understood by the gateway (e.g., "google/gemini-2.5-flash")

use super::{LlmProvider, LlmRequest, LlmResponse, ProviderError, TokenUsage};
use crate::GatewayConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// AI gateway provider
pub struct GatewayProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl GatewayProvider {
    /// Create a provider for the given gateway
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
            api_key,
            model: model.into(),
        })
    }

    /// Create a provider from configuration, resolving the API key from the environment if needed
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ProviderError> {
        Self::new(
            &config.base_url,
            config.resolve_api_key(),
            &config.model,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Whether an API key is available
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// OpenAI-compatible chat request
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// OpenAI-compatible chat response
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[async_trait]
impl LlmProvider for GatewayProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;
        let url = format!("{}/chat/completions", self.base_url);

        let chat_request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
        };

        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&chat_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => {
                    warn!(model = %self.model, "AI gateway rate limited the request");
                    ProviderError::RateLimited
                }
                StatusCode::PAYMENT_REQUIRED => {
                    warn!(model = %self.model, "AI gateway requires payment");
                    ProviderError::PaymentRequired
                }
                _ => {
                    let body = response.text().await.unwrap_or_default();
                    error!(status = status.as_u16(), body = %body, "AI gateway error");
                    ProviderError::Upstream {
                        status: status.as_u16(),
                        body,
                    }
                }
            });
        }

        let chat_response: ChatResponse = response.json().await?;
        let duration_ms = start.elapsed().as_millis() as u64;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ProviderError::EmptyResponse)?;

        debug!(content_len = content.len(), duration_ms, "Got gateway completion");

        let usage = chat_response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(LlmResponse {
            content,
            usage,
            duration_ms: Some(duration_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    /// Serve a fake gateway that answers every completion with `status` and `body`.
    async fn spawn_gateway(status: u16, body: Value) -> String {
        let app = Router::new().route(
            "/chat/completions",
            post(move |headers: HeaderMap, Json(request): Json<Value>| {
                let body = body.clone();
                async move {
                    let authorized = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        == Some("Bearer test-key");
                    if !authorized || request["messages"][0]["role"] != "system" {
                        return (axum::http::StatusCode::UNAUTHORIZED, Json(json!({})));
                    }
                    let status = axum::http::StatusCode::from_u16(status).unwrap();
                    (status, Json(body))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn provider(base_url: &str, api_key: Option<&str>) -> GatewayProvider {
        GatewayProvider::new(
            base_url,
            api_key.map(str::to_string),
            "test-model",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_provider_creation() {
        let provider = provider("http://localhost:4000/v1/", Some("k"));
        assert_eq!(provider.model(), "test-model");
        assert_eq!(provider.base_url, "http://localhost:4000/v1");
        assert!(provider.has_api_key());
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let url = spawn_gateway(
            200,
            json!({
                "choices": [{"message": {"role": "assistant", "content": "hello"}}],
                "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
            }),
        )
        .await;

        let response = provider(&url, Some("test-key"))
            .complete(&LlmRequest::new("sys", "user"))
            .await
            .unwrap();
        assert_eq!(response.content, "hello");
        assert_eq!(
            response.usage,
            Some(TokenUsage {
                prompt_tokens: 3,
                completion_tokens: 1,
                total_tokens: 4
            })
        );
        assert!(response.duration_ms.is_some());
    }

    #[tokio::test]
    async fn test_rate_limit_and_payment_statuses() {
        let url = spawn_gateway(429, json!({"error": "slow down"})).await;
        let err = provider(&url, Some("test-key"))
            .complete(&LlmRequest::new("sys", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited));

        let url = spawn_gateway(402, json!({"error": "no credits"})).await;
        let err = provider(&url, Some("test-key"))
            .complete(&LlmRequest::new("sys", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::PaymentRequired));
    }

    #[tokio::test]
    async fn test_other_failures_keep_status_and_body() {
        let url = spawn_gateway(503, json!({"error": "down"})).await;
        let err = provider(&url, Some("test-key"))
            .complete(&LlmRequest::new("sys", "user"))
            .await
            .unwrap_err();
        match err {
            ProviderError::Upstream { status, body } => {
                assert_eq!(status, 503);
                assert!(body.contains("down"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let url = spawn_gateway(200, json!({"choices": []})).await;
        let err = provider(&url, Some("test-key"))
            .complete(&LlmRequest::new("sys", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_sending() {
        // Nothing listens on this port; the call must not get as far as connecting.
        let err = provider("http://127.0.0.1:9", None)
            .complete(&LlmRequest::new("sys", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey));
    }
}
