//! Language detection handler

use axum::{Json, body::Bytes, extract::State};
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::AppState;
use crate::models::{DetectRequest, DetectResponse};
use crate::utils::error::{API_KEY_NOT_CONFIGURED, ErrorResponse};
use crate::utils::{ApiError, ApiResult};

/// Detect the language of a message
///
/// The body is read as raw JSON rather than through `Json<DetectRequest>` so
/// that a missing or unreadable body is reported as "No message provided".
#[utoipa::path(
    post,
    path = "/api/detect",
    request_body = DetectRequest,
    responses(
        (status = 200, description = "Detection result (unknown/0 on classification failure)", body = DetectResponse),
        (status = 400, description = "Missing or empty message", body = ErrorResponse),
        (status = 500, description = "Gemini API key not configured", body = ErrorResponse),
    ),
    tag = "Detection"
)]
pub async fn detect(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<DetectResponse>> {
    let message = extract_message(&body)?;

    if message.trim().is_empty() {
        return Err(ApiError::validation_error("Message cannot be empty"));
    }

    if !state.llm_service.is_available() {
        return Err(ApiError::configuration_error(API_KEY_NOT_CONFIGURED));
    }

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("detect", %request_id);
    let result = async {
        tracing::debug!("Detecting language for {} chars", message.chars().count());
        let result = state.llm_service.detect_language(&message).await?;
        tracing::info!(
            language = %result.language,
            confidence = result.confidence,
            "Detection finished"
        );
        Ok::<_, ApiError>(result)
    }
    .instrument(span)
    .await?;

    Ok(Json(DetectResponse::new(message, result)))
}

fn extract_message(body: &[u8]) -> ApiResult<String> {
    let no_message = || ApiError::validation_error("No message provided");

    let payload: Value = serde_json::from_slice(body).map_err(|_| no_message())?;
    match payload.get("message") {
        None | Some(Value::Null) => Err(no_message()),
        Some(Value::String(message)) => Ok(message.clone()),
        Some(_) => Err(ApiError::validation_error("Message must be a string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message() {
        assert_eq!(extract_message(br#"{"message":"hi"}"#).unwrap(), "hi");
        assert_eq!(extract_message(br#"{"message":"hi","extra":1}"#).unwrap(), "hi");
        assert!(extract_message(b"").is_err());
        assert!(extract_message(br#"{"message":["hi"]}"#).is_err());
    }
}
