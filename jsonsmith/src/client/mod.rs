//! HTTP client for the proxy endpoints

mod workbench;

pub use workbench::{ChatMessage, ChatTranscript, Enhancer, Role, Workbench};

use crate::analysis::AnalysisKind;
use crate::api::{
    AnalyzeRequest, AnalyzeResponse, EnhanceRequest, ErrorResponse, ANALYZE_JSON_PATH,
    ENHANCE_PROMPT_PATH,
};
use crate::document::DocumentError;
use crate::enhance::{Enhancement, PromptCategory};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Errors surfaced to the user of a tool
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Please enter a prompt")]
    EmptyPrompt,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The proxy answered with an `{error}` body
    #[error("{message}")]
    Server { status: u16, message: String },
}

/// Operations offered by the proxy endpoints
#[async_trait]
pub trait ProxyApi: Send + Sync {
    /// Run one analysis over an already parsed document
    async fn analyze(
        &self,
        document: &Value,
        kind: AnalysisKind,
        query: Option<&str>,
    ) -> Result<String, ClientError>;

    /// Enhance a raw prompt
    async fn enhance(
        &self,
        prompt: &str,
        category: PromptCategory,
    ) -> Result<Enhancement, ClientError>;
}

/// Client for a running jsonsmith server
pub struct ProxyClient {
    client: Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(300)).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "Proxy response");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error)
                .unwrap_or_else(|_| format!("Request failed with status {}", status.as_u16()));
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ProxyApi for ProxyClient {
    async fn analyze(
        &self,
        document: &Value,
        kind: AnalysisKind,
        query: Option<&str>,
    ) -> Result<String, ClientError> {
        let request = AnalyzeRequest {
            json_data: Some(document.clone()),
            kind: Some(kind.to_string()),
            query: query.map(str::to_string),
        };
        let response: AnalyzeResponse = self.post(ANALYZE_JSON_PATH, &request).await?;
        Ok(response.result)
    }

    async fn enhance(
        &self,
        prompt: &str,
        category: PromptCategory,
    ) -> Result<Enhancement, ClientError> {
        let request = EnhanceRequest {
            prompt: Some(prompt.to_string()),
            prompt_type: Some(category.to_string()),
        };
        self.post(ENHANCE_PROMPT_PATH, &request).await
    }
}
