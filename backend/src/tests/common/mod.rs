// Common test utilities and helpers

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use crate::services::llm::{LLMClient, LLMError, LLMServiceImpl};
use crate::{AppState, build_router};

enum Scripted {
    Text(String),
    ApiError(String),
}

/// LLM client that returns a fixed outcome and records every prompt it sees
pub struct ScriptedClient {
    outcome: Scripted,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn with(outcome: Scripted) -> Self {
        Self { outcome, calls: AtomicUsize::new(0), prompts: Mutex::new(Vec::new()) }
    }

    /// Succeed with the given raw model text
    pub fn reply(text: impl Into<String>) -> Self {
        Self::with(Scripted::Text(text.into()))
    }

    /// Fail as the provider would on a non-2xx response
    pub fn api_error(message: impl Into<String>) -> Self {
        Self::with(Scripted::ApiError(message.into()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LLMClient for ScriptedClient {
    fn provider(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, LLMError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.outcome {
            Scripted::Text(text) => Ok(text.clone()),
            Scripted::ApiError(msg) => Err(LLMError::ApiError(msg.clone())),
        }
    }
}

/// Router wired to an optional scripted client (None = API key not configured)
pub fn test_app(client: Option<Arc<ScriptedClient>>) -> Router {
    let client = client.map(|c| c as Arc<dyn LLMClient>);
    let state = Arc::new(AppState::new(LLMServiceImpl::new(client)));
    build_router(state)
}

/// POST a raw body to /api/detect
pub async fn post_detect(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/detect")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
