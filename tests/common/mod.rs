//! Shared helpers: a fresh in-memory router and JSON request shortcuts.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use dev_registry::{build_router, AppState};

pub const BODY_LIMIT: usize = 64 * 1024;

pub fn test_app() -> Router {
    build_router(AppState::in_memory(), BODY_LIMIT)
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

pub async fn send(app: &Router, method: &str, path: &str, body: Option<Value>) -> Reply {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_request(app, request).await
}

pub async fn send_request(app: &Router, request: Request<Body>) -> Reply {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(json!(null));
    Reply {
        status,
        headers,
        json,
    }
}

pub async fn get(app: &Router, path: &str) -> Reply {
    send(app, "GET", path, None).await
}

pub async fn post(app: &Router, path: &str, body: Value) -> Reply {
    send(app, "POST", path, Some(body)).await
}

pub async fn put(app: &Router, path: &str, body: Value) -> Reply {
    send(app, "PUT", path, Some(body)).await
}

pub async fn delete(app: &Router, path: &str) -> Reply {
    send(app, "DELETE", path, None).await
}

/// Creates a developer and returns its id.
pub async fn create_developer(app: &Router, first: &str, last: &str) -> i64 {
    let reply = post(app, "/v1/developer", json!({"firstName": first, "lastName": last})).await;
    assert_eq!(reply.status, StatusCode::CREATED);
    reply.json["id"].as_i64().unwrap()
}

/// Creates a language and returns its id.
pub async fn create_language(app: &Router, name: &str, creators: &str) -> i64 {
    let reply = post(
        app,
        "/v1/programming_language",
        json!({"name": name, "creatorsName": creators}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    reply.json["id"].as_i64().unwrap()
}
