use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::tests::common::{ScriptedClient, get_json, post_detect, test_app};

const SINHALA_REPLY: &str =
    r#"{"language":"sinhala","confidence":92,"analysis":"Text is written in Sinhala script."}"#;

fn scripted(reply: &str) -> Arc<ScriptedClient> {
    Arc::new(ScriptedClient::reply(reply))
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_missing_message_is_rejected() {
    let client = scripted(SINHALA_REPLY);

    for body in ["{}", "", "not json", "[]", r#"{"text":"hello"}"#, r#"{"message":null}"#] {
        let (status, value) = post_detect(test_app(Some(client.clone())), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", body);
        assert_eq!(value["error"], "No message provided", "body {:?}", body);
    }

    assert_eq!(client.calls(), 0, "validation failures must not call the model");
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let client = scripted(SINHALA_REPLY);

    for message in ["", "   ", "\n\t "] {
        let body = json!({ "message": message }).to_string();
        let (status, value) = post_detect(test_app(Some(client.clone())), &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["error"], "Message cannot be empty");
    }

    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_non_string_message_is_rejected() {
    let client = scripted(SINHALA_REPLY);
    let (status, value) = post_detect(test_app(Some(client.clone())), r#"{"message":42}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!value["error"].as_str().unwrap().is_empty());
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_missing_api_key_returns_500() {
    let (status, value) = post_detect(test_app(None), r#"{"message":"Hello there"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(value["error"].as_str().unwrap().contains("API key not configured"));
}

#[tokio::test]
async fn test_input_validation_runs_before_key_check() {
    let (status, value) = post_detect(test_app(None), r#"{"message":"  "}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"], "Message cannot be empty");
}

// ============================================================================
// Classification
// ============================================================================

#[tokio::test]
async fn test_detect_returns_normalized_result() {
    let client = scripted(SINHALA_REPLY);
    let (status, value) =
        post_detect(test_app(Some(client.clone())), r#"{"message":"ආයුබෝවන් ඔබට"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["user_message"], "ආයුබෝවන් ඔබට");
    assert_eq!(value["detected_language"], "sinhala");
    assert_eq!(value["confidence"].as_f64(), Some(92.0));
    assert_eq!(value["analysis"], "Text is written in Sinhala script.");
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_user_message_is_echoed_untrimmed() {
    let client = scripted(SINHALA_REPLY);
    let (_, value) =
        post_detect(test_app(Some(client.clone())), r#"{"message":"  kohomada oyata?  "}"#).await;

    assert_eq!(value["user_message"], "  kohomada oyata?  ");
    assert!(client.last_prompt().unwrap().contains("  kohomada oyata?  "));
}

#[tokio::test]
async fn test_fenced_reply_matches_plain_reply() {
    let fenced = format!("```json\n{}\n```", SINHALA_REPLY);
    let body = r#"{"message":"මම ඉතා සතුටුයි"}"#;

    let (_, plain_value) = post_detect(test_app(Some(scripted(SINHALA_REPLY))), body).await;
    let (status, fenced_value) = post_detect(test_app(Some(scripted(&fenced))), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(plain_value, fenced_value);
}

#[tokio::test]
async fn test_non_json_reply_returns_fallback() {
    let client = scripted("Sorry, I cannot help with that.");
    let (status, value) =
        post_detect(test_app(Some(client)), r#"{"message":"Hello, how are you today?"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["detected_language"], "unknown");
    assert_eq!(value["confidence"].as_f64(), Some(0.0));
    let analysis = value["analysis"].as_str().unwrap();
    assert!(analysis.starts_with("Error parsing AI response:"), "{}", analysis);
}

#[tokio::test]
async fn test_provider_error_returns_fallback() {
    let client = Arc::new(ScriptedClient::api_error("400 API key not valid"));
    let (status, value) =
        post_detect(test_app(Some(client)), r#"{"message":"api yanawa gedara"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["detected_language"], "unknown");
    assert_eq!(value["confidence"].as_f64(), Some(0.0));
    assert!(value["analysis"].as_str().unwrap().contains("API key not valid"));
}

#[tokio::test]
async fn test_repeated_requests_are_independent() {
    let client = scripted("not json at all");
    let body = r#"{"message":"machan, mokada karanne?"}"#;

    let (_, first) = post_detect(test_app(Some(client.clone())), body).await;
    let (_, second) = post_detect(test_app(Some(client.clone())), body).await;

    assert_eq!(first, second);
    assert_eq!(client.calls(), 2);
}

// ============================================================================
// Health, UI and docs
// ============================================================================

#[tokio::test]
async fn test_health_reports_key_status() {
    let (status, value) = get_json(test_app(None), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"status": "healthy", "gemini_api_configured": false}));

    let (status, value) = get_json(test_app(Some(scripted(SINHALA_REPLY))), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["gemini_api_configured"], true);
}

#[tokio::test]
async fn test_index_serves_html() {
    let response = test_app(None)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("/api/detect"));
}

#[tokio::test]
async fn test_unknown_asset_is_404() {
    let response = test_app(None)
        .oneshot(Request::builder().uri("/missing.css").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document_lists_endpoints() {
    let (status, value) = get_json(test_app(None), "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(value["paths"]["/api/detect"]["post"].is_object());
    assert!(value["paths"]["/api/health"]["get"].is_object());
}
