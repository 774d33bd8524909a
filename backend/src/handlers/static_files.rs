//! Embedded single-page UI

use axum::{
    body::Body,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "web/"]
struct WebAssets;

fn mime_type(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

fn serve_embedded(path: &str) -> Response {
    match WebAssets::get(path) {
        Some(content) => (
            [(header::CONTENT_TYPE, mime_type(path))],
            Body::from(content.data.into_owned()),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

/// GET /
pub async fn index() -> Response {
    serve_embedded("index.html")
}

/// Any other path: an embedded asset or 404
pub async fn asset(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    tracing::debug!("Serving static asset: {}", path);
    serve_embedded(path)
}
