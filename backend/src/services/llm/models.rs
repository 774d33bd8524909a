//! LLM service shared types

use thiserror::Error;

/// Analysis scenario served by the LLM layer, used for log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LLMScenario {
    LanguageDetection,
}

impl LLMScenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LanguageDetection => "language_detection",
        }
    }
}

#[derive(Debug, Error)]
pub enum LLMError {
    #[error("No LLM provider configured")]
    NoProviderConfigured,

    #[error("Request to LLM API failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("LLM returned no text ({0})")]
    EmptyResponse(String),

    #[error("{0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid `{field}` in LLM reply: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl LLMError {
    /// The reply arrived but was not valid JSON.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::ParseError(_))
    }

    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField { field, reason: reason.into() }
    }
}
