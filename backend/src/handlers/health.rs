use axum::{Json, extract::State};
use std::sync::Arc;

use crate::AppState;
use crate::models::HealthResponse;

/// Service health and API key status
///
/// Does not contact the Gemini API.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "System"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        gemini_api_configured: state.llm_service.is_available(),
    })
}
