//! HTTP telemetry middleware.
//!
//! Wraps every request in a tracing span, propagates `X-Request-ID` and feeds
//! the request metrics.

use axum::{
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{field::Empty, Instrument, Level};
use uuid::Uuid;

use crate::app::endpoint_label;
use crate::utils::metrics::RequestTimer;

pub const HEADER_REQUEST_ID: &str = "X-Request-ID";

/// HTTP telemetry middleware for request tracing.
pub async fn telemetry_middleware<B>(req: Request<B>, next: Next<B>) -> Response {
    let request_id = extract_request_id(&req);
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    let started = Instant::now();
    let mut timer = RequestTimer::start(endpoint_label(&path), method.as_str());

    // Liveness and scrape traffic only at DEBUG
    let span = if path == "/ping" || path == "/metrics" {
        tracing::span!(
            Level::DEBUG,
            "http",
            request_id = %request_id,
            method = %method,
            path = %path,
            status = Empty,
            duration_ms = Empty,
        )
    } else {
        tracing::span!(
            Level::INFO,
            "http",
            request_id = %request_id,
            method = %method,
            path = %path,
            status = Empty,
            duration_ms = Empty,
        )
    };

    let mut res = next.run(req).instrument(span.clone()).await;

    let status = res.status().as_u16();
    let duration = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    span.record("status", status);
    span.record("duration_ms", duration);
    timer.set_status(status);
    timer.complete();

    res.headers_mut().insert(
        HEADER_REQUEST_ID,
        HeaderValue::from_str(&request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );

    res
}

/// Extracts or generates request ID.
fn extract_request_id<B>(req: &Request<B>) -> String {
    req.headers()
        .get(HEADER_REQUEST_ID)
        .or_else(|| req.headers().get("request-id"))
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    async fn handler() -> &'static str {
        "OK"
    }

    fn app() -> Router {
        Router::new()
            .route("/test", get(handler))
            .layer(axum::middleware::from_fn(telemetry_middleware))
    }

    #[tokio::test]
    async fn test_request_id_generation() {
        let response = app()
            .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let id = response.headers().get(HEADER_REQUEST_ID).unwrap();
        assert!(Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_request_id_passthrough() {
        let test_id = "test-request-123";
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/test")
                    .header(HEADER_REQUEST_ID, test_id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(HEADER_REQUEST_ID).unwrap(), test_id);
    }

    #[test]
    fn test_extract_request_id() {
        // No headers
        let req = Request::builder().body(()).unwrap();
        assert!(!extract_request_id(&req).is_empty());

        // Header names are case-insensitive
        let req = Request::builder()
            .header("x-request-id", "test-456")
            .body(())
            .unwrap();
        assert_eq!(extract_request_id(&req), "test-456");

        // Alternate header
        let req = Request::builder()
            .header("request-id", "alt-789")
            .body(())
            .unwrap();
        assert_eq!(extract_request_id(&req), "alt-789");

        // Empty header (should generate new)
        let req = Request::builder()
            .header("X-Request-ID", "")
            .body(())
            .unwrap();
        assert!(!extract_request_id(&req).is_empty());
    }
}
