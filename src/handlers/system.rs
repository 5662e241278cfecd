//! Operational endpoints and catch-alls.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use crate::utils::errors::ApiError;
use crate::utils::metrics::{gather_metrics, ERRORS_TOTAL};

/// `GET /metrics` in Prometheus text exposition format.
pub async fn metrics_handler() -> Response {
    match gather_metrics() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => ApiError::internal(format!("Failed to encode metrics: {e}")).into_response(),
    }
}

/// Fallback for unknown paths.
pub async fn not_found_handler() -> ApiError {
    ERRORS_TOTAL.with_label_values(&["not_found"]).inc();
    ApiError::not_found()
}

/// Fallback for known paths hit with the wrong method.
pub async fn method_not_allowed_handler() -> ApiError {
    ERRORS_TOTAL.with_label_values(&["method_not_allowed"]).inc();
    ApiError::method_not_allowed()
}
