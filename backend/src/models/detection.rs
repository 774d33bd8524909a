use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Language category used when classification could not be completed.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Normalized outcome of one classification call.
///
/// Always fully populated: failures produce [`DetectionResult::fallback`]
/// rather than a partial value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DetectionResult {
    /// Lower-cased category name (english, sinhala, singlish, tamil, mixed, other, unknown)
    pub language: String,
    /// Model confidence, nominally 0-100; passed through unclamped
    pub confidence: f64,
    pub analysis: String,
}

impl DetectionResult {
    pub fn fallback(analysis: impl Into<String>) -> Self {
        Self { language: UNKNOWN_LANGUAGE.to_string(), confidence: 0.0, analysis: analysis.into() }
    }

    pub fn is_fallback(&self) -> bool {
        self.language == UNKNOWN_LANGUAGE && self.confidence == 0.0
    }
}

/// Body of `POST /api/detect` (documentation only; the handler reads raw JSON
/// so that a missing field maps to a 400 with a readable message)
#[derive(Debug, Deserialize, ToSchema)]
pub struct DetectRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DetectResponse {
    pub user_message: String,
    pub detected_language: String,
    pub confidence: f64,
    pub analysis: String,
}

impl DetectResponse {
    pub fn new(user_message: String, result: DetectionResult) -> Self {
        Self {
            user_message,
            detected_language: result.language,
            confidence: result.confidence,
            analysis: result.analysis,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub gemini_api_configured: bool,
}
