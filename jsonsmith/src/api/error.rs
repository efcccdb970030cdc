use crate::analysis::AnalysisError;
use crate::enhance::EnhanceError;
use crate::provider::ProviderError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::ErrorResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Body was not valid JSON for the endpoint
    #[error("Invalid request body: {0}")]
    BadRequest(String),

    /// A required field was missing or invalid
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Gateway(#[from] ProviderError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<EnhanceError> for ApiError {
    fn from(err: EnhanceError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Gateway(ProviderError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Gateway(ProviderError::PaymentRequired) => StatusCode::PAYMENT_REQUIRED,
            ApiError::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
