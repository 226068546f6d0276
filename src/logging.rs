//! Tracing setup and the per-request access log.

use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

pub const X_REQUEST_ID: &str = "x-request-id";
const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";
const MAX_REQUEST_ID_LEN: usize = 128;

/// Install the global fmt subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // try_init: tests and embedders may have installed a subscriber already.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// First hop of `X-Forwarded-For`, then `X-Real-IP`, then the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    if let Some(first) = header(X_FORWARDED_FOR)
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return first.to_string();
    }
    if let Some(real) = header(X_REAL_IP) {
        return real.to_string();
    }
    peer.map(|p| p.ip().to_string()).unwrap_or_else(|| "-".into())
}

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Logs method, path, status and latency for every request outside `/api-docs`,
/// and echoes `X-Request-Id` on the response.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let quiet = path.starts_with("/api-docs");
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_ip(req.headers(), peer);
    let id = request_id(req.headers());

    let start = Instant::now();
    let mut resp = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }
    if quiet {
        return resp;
    }

    let status = resp.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;
    if resp.status().is_server_error() {
        tracing::error!(request_id = %id, client_ip = %ip, %method, %path, status, duration_ms, "request");
    } else if resp.status().is_client_error() {
        tracing::warn!(request_id = %id, client_ip = %ip, %method, %path, status, duration_ms, "request");
    } else {
        tracing::info!(request_id = %id, client_ip = %ip, %method, %path, status, duration_ms, "request");
    }
    resp
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn forwarded_for_takes_first_hop() {
        let h = headers(&[("x-forwarded-for", "10.0.0.1, 10.0.0.2"), ("x-real-ip", "10.9.9.9")]);
        assert_eq!(client_ip(&h, None), "10.0.0.1");
    }

    #[test]
    fn real_ip_then_peer() {
        let h = headers(&[("x-real-ip", "10.9.9.9")]);
        assert_eq!(client_ip(&h, None), "10.9.9.9");
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        assert_eq!(client_ip(&HeaderMap::new(), Some(peer)), "127.0.0.1");
        assert_eq!(client_ip(&HeaderMap::new(), None), "-");
    }

    #[test]
    fn request_id_is_reused_or_generated() {
        let h = headers(&[("x-request-id", "abc")]);
        assert_eq!(request_id(&h), "abc");
        let generated = request_id(&HeaderMap::new());
        assert!(uuid::Uuid::parse_str(&generated).is_ok());
    }
}
