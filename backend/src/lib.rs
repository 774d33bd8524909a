//! Language detection web service
//!
//! Forwards user text to Gemini with a classification prompt and relays a
//! normalized `{language, confidence, analysis}` result to the browser.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::services::LLMServiceImpl;

/// Shared, read-only application state built once at startup
pub struct AppState {
    pub llm_service: LLMServiceImpl,
}

impl AppState {
    pub fn new(llm_service: LLMServiceImpl) -> Self {
        Self { llm_service }
    }

    pub fn from_config(config: &Config) -> Result<Self, anyhow::Error> {
        let llm_service = LLMServiceImpl::from_config(&config.gemini)?;
        Ok(Self::new(llm_service))
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Language Detection API",
        version = "1.0.0",
        description = "Gemini-backed detection of English, Sinhala, Singlish, Tamil and mixed text"
    ),
    paths(handlers::detect::detect, handlers::health::health),
    components(schemas(
        models::DetectRequest,
        models::DetectResponse,
        models::HealthResponse,
        utils::error::ErrorResponse,
    )),
    tags(
        (name = "Detection", description = "Language detection"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::static_files::index))
        .route("/api/detect", post(handlers::detect::detect))
        .route("/api/health", get(handlers::health::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::static_files::asset)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
