use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::services::llm::LLMError;

/// Message returned when `/api/detect` is called without a Gemini key.
pub const API_KEY_NOT_CONFIGURED: &str = "Gemini API key not configured. Please copy env.example \
to .env and set GEMINI_API_KEY or export it in your environment.";

/// API Error surfaced to HTTP callers
///
/// Classification failures never appear here: they are folded into a
/// fallback detection result before reaching the handler.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or empty client input (400)
    #[error("{0}")]
    ValidationError(String),

    /// Missing deployment configuration such as the API key (500)
    #[error("{0}")]
    ConfigurationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    /// Helper to create validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Helper to create configuration error
    pub fn configuration_error(message: impl Into<String>) -> Self {
        Self::ConfigurationError(message.into())
    }

    /// Helper to create internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::ConfigurationError(_) | Self::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }
}

/// Error body shared by every failing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::ValidationError(msg) => tracing::debug!("Rejected request: {}", msg),
            Self::ConfigurationError(msg) => tracing::warn!("Configuration error: {}", msg),
            Self::InternalError(_) => tracing::error!("{}", self),
        }

        let body = ErrorResponse { error: self.to_string() };
        (status, Json(body)).into_response()
    }
}

impl From<LLMError> for ApiError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::NoProviderConfigured => Self::configuration_error(API_KEY_NOT_CONFIGURED),
            other => Self::internal_error(other.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
