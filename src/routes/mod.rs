//! Router assembly.

mod common;
mod registry;

pub use common::common_routes_with_ready;
pub use registry::{developer_routes, language_routes};

use crate::error::AppError;
use crate::logging::log_requests;
use crate::openapi::ApiDoc;
use crate::state::AppState;
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::limit::RequestBodyLimitLayer;
use utoipa::OpenApi;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// The body-limit layer rejects an oversized `Content-Length` before any extractor
/// runs; give that rejection the JSON error body as well.
async fn json_payload_too_large(req: Request, next: Next) -> Response {
    let resp = next.run(req).await;
    let is_json = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if resp.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        return AppError::PayloadTooLarge.into_response();
    }
    resp
}

/// The full application: resources, probes, OpenAPI document, body limit and access log.
pub fn build_router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(developer_routes(state.clone()))
        .merge(language_routes(state))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(middleware::from_fn(json_payload_too_large))
        .layer(middleware::from_fn(log_requests))
}
