//! REST API: the analyze-json and enhance-prompt proxy endpoints

mod error;

pub use error::{ApiError, ApiResult};

use crate::analysis::{self, AnalysisKind};
use crate::enhance::{self, parse_enhancement, Enhancement, PromptCategory};
use crate::provider::{LlmProvider, LlmResponse, ProviderError};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub const ANALYZE_JSON_PATH: &str = "/functions/v1/analyze-json";
pub const ENHANCE_PROMPT_PATH: &str = "/functions/v1/enhance-prompt";

/// API state
pub struct ApiState {
    pub provider: Arc<dyn LlmProvider>,
    pub enhance_temperature: f32,
    pub api_key_configured: bool,
}

/// Request body for analyze-json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// The parsed document to analyze. An explicit `null` is a document;
    /// only an absent key is `None`.
    #[serde(default, deserialize_with = "present_value")]
    pub json_data: Option<Value>,
    /// One of explain, docs, summary, query
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Question, required when `type` is query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub result: String,
}

/// Request body for enhance-prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    /// Category name; unknown or missing values mean `custom`
    #[serde(default)]
    pub prompt_type: Option<String>,
}

/// Body of every failed response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub api_key_configured: bool,
}

/// Create the API router
pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(ANALYZE_JSON_PATH, post(analyze_json))
        .route(ENHANCE_PROMPT_PATH, post(enhance_prompt))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.provider.model().to_string(),
        api_key_configured: state.api_key_configured,
    })
}

/// Explain, document, summarize or answer a question about a JSON document
async fn analyze_json(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let Json(request) = payload?;
    require_api_key(&state)?;

    let kind: AnalysisKind = request.kind.as_deref().unwrap_or_default().parse()?;
    let document = request
        .json_data
        .ok_or_else(|| ApiError::Validation("jsonData is required".to_string()))?;
    let llm_request = analysis::build_request(kind, &document, request.query.as_deref())?;

    info!(kind = %kind, "Analyzing JSON");

    let response = state
        .provider
        .complete(&llm_request)
        .await
        .inspect_err(|e| error!(error = %e, kind = %kind, "Error in analyze-json"))?;
    log_completion(&response, "Analysis complete");

    Ok(Json(AnalyzeResponse {
        result: response.content,
    }))
}

/// Turn a raw prompt into structured JSON plus a comparison
async fn enhance_prompt(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<EnhanceRequest>, JsonRejection>,
) -> ApiResult<Json<Enhancement>> {
    let Json(request) = payload?;
    require_api_key(&state)?;

    let category = PromptCategory::from_name(request.prompt_type.as_deref().unwrap_or_default());
    let llm_request = enhance::build_request(
        category,
        request.prompt.as_deref().unwrap_or_default(),
        state.enhance_temperature,
    )?;

    info!(category = %category, "Enhancing prompt");

    let response = state
        .provider
        .complete(&llm_request)
        .await
        .inspect_err(|e| error!(error = %e, category = %category, "Error in enhance-prompt"))?;

    log_completion(&response, "Successfully enhanced prompt");
    let enhancement = parse_enhancement(&response.content);

    Ok(Json(enhancement))
}

/// Fail fast when no gateway key is configured, before validating the body
fn require_api_key(state: &ApiState) -> ApiResult<()> {
    if state.api_key_configured {
        Ok(())
    } else {
        Err(ProviderError::MissingApiKey.into())
    }
}

fn log_completion(response: &LlmResponse, message: &str) {
    match &response.usage {
        Some(usage) => info!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            duration_ms = response.duration_ms,
            "{message}"
        ),
        None => info!(duration_ms = response.duration_ms, "{message}"),
    }
}
