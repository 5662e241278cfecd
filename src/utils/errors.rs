//! Error handling for the random user service.
//!
//! Two layers:
//!
//! 1.  **Public layer (`ApiError`, `ApiStatus`):** the API contract, i.e. the
//!     JSON body `{ "error": ..., "details"?: [...] }` and the HTTP status.
//!
//! 2.  **Internal layer (`ServiceError`, `UpstreamError`):** what actually went
//!     wrong inside a request, with diagnostic context (`source`, `span`) for
//!     logging.
//!
//! Conversion from the internal to the public layer happens in one place:
//! `impl From<ServiceError> for ApiError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing_error::SpanTrace;

use crate::schema::ValidationErrors;
use crate::transform::TransformError;
use crate::utils::metrics::ERRORS_TOTAL;
use crate::{log_debug, log_error, log_info, log_warn};

// =============================================================================
// LAYER 1: PUBLIC API CONTRACT (what the client sees)
// =============================================================================

/// Error classes exposed by the API. Each maps to exactly one HTTP status.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApiStatus {
    ValidationError,
    UpstreamUnavailable,
    UpstreamContract,
    UpstreamData,
    NotFound,
    MethodNotAllowed,
    InternalError,
}

impl ApiStatus {
    pub fn status_code(self) -> StatusCode {
        match self {
            ApiStatus::ValidationError => StatusCode::BAD_REQUEST,
            ApiStatus::NotFound => StatusCode::NOT_FOUND,
            ApiStatus::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiStatus::UpstreamUnavailable
            | ApiStatus::UpstreamContract
            | ApiStatus::UpstreamData
            | ApiStatus::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: ApiStatus,
    /// Human-readable summary.
    pub error: String,
    /// Field-level issues, when the failure came from a shape check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ValidationErrors>,
}

impl ApiError {
    /// The main `ApiError` constructor, which includes severity-based logging logic.
    pub fn new(status: ApiStatus, msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        let outcome = format!("{:?}", status);

        match status {
            ApiStatus::UpstreamUnavailable | ApiStatus::UpstreamData | ApiStatus::InternalError => {
                log_error!("ApiError", &msg, &outcome);
            }
            ApiStatus::UpstreamContract => {
                log_warn!("ApiError", &msg, &outcome);
            }
            ApiStatus::NotFound | ApiStatus::MethodNotAllowed => {
                log_info!("ApiError", &msg, &outcome);
            }
            ApiStatus::ValidationError => {
                log_debug!("ApiError", &msg, &outcome);
            }
        }

        ApiError {
            status,
            error: msg,
            details: None,
        }
    }

    pub fn with_details(mut self, details: ValidationErrors) -> Self {
        self.details = Some(details);
        self
    }

    // Helper constructors
    pub fn validation_failed(details: ValidationErrors) -> Self {
        Self::new(ApiStatus::ValidationError, "Validation failed").with_details(details)
    }
    pub fn fetch_failed() -> Self {
        Self::new(ApiStatus::UpstreamUnavailable, "Failed to fetch data")
    }
    pub fn invalid_upstream_data(details: ValidationErrors) -> Self {
        Self::new(ApiStatus::UpstreamContract, "Invalid data from API").with_details(details)
    }
    pub fn invalid_upstream_date() -> Self {
        Self::new(ApiStatus::UpstreamData, "Invalid registration date from API")
    }
    pub fn not_found() -> Self {
        Self::new(ApiStatus::NotFound, "Not found")
    }
    pub fn method_not_allowed() -> Self {
        Self::new(ApiStatus::MethodNotAllowed, "Method not allowed")
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ApiStatus::InternalError, msg)
    }
}

// =============================================================================
// LAYER 2: INTERNAL APPLICATION ERRORS (with full context)
// =============================================================================

/// Failures talking to the random user API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Upstream request timed out")]
    Timeout {
        #[source]
        source: reqwest::Error,
        span: SpanTrace,
    },
    #[error("Upstream transport error")]
    Transport {
        #[source]
        source: reqwest::Error,
        span: SpanTrace,
    },
    #[error("Upstream responded with HTTP {status}")]
    Status { status: u16, span: SpanTrace },
    #[error("Upstream body is not valid JSON")]
    Decode {
        #[source]
        source: serde_json::Error,
        span: SpanTrace,
    },
}

impl UpstreamError {
    pub fn status(status: u16) -> Self {
        UpstreamError::Status {
            status,
            span: SpanTrace::capture(),
        }
    }

    pub fn decode(source: serde_json::Error) -> Self {
        UpstreamError::Decode {
            source,
            span: SpanTrace::capture(),
        }
    }

    /// Label used for the `outcome` metric dimension.
    pub fn outcome(&self) -> &'static str {
        match self {
            UpstreamError::Timeout { .. } => "timeout",
            UpstreamError::Transport { .. } => "transport",
            UpstreamError::Status { .. } => "status",
            UpstreamError::Decode { .. } => "decode",
        }
    }

    fn span(&self) -> &SpanTrace {
        match self {
            UpstreamError::Timeout { span, .. }
            | UpstreamError::Transport { span, .. }
            | UpstreamError::Status { span, .. }
            | UpstreamError::Decode { span, .. } => span,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout {
                source: err,
                span: SpanTrace::capture(),
            }
        } else {
            UpstreamError::Transport {
                source: err,
                span: SpanTrace::capture(),
            }
        }
    }
}

/// The unified error type for request processing.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Inbound body failed its shape check.
    #[error("Client input rejected: {0}")]
    ClientInput(ValidationErrors),

    /// The upstream could not be reached or did not return JSON.
    #[error(transparent)]
    UpstreamFetch(#[from] UpstreamError),

    /// The upstream returned JSON of the wrong shape.
    #[error("Upstream contract violated: {0}")]
    UpstreamShape(ValidationErrors),

    /// The upstream payload had the right shape but unusable content.
    #[error("Upstream data rejected: {source}")]
    UpstreamData {
        #[source]
        source: TransformError,
        span: SpanTrace,
    },
}

impl ServiceError {
    /// Label used for the `kind` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::ClientInput(_) => "client_input",
            ServiceError::UpstreamFetch(_) => "upstream_fetch",
            ServiceError::UpstreamShape(_) => "upstream_shape",
            ServiceError::UpstreamData { .. } => "upstream_data",
        }
    }
}

impl From<TransformError> for ServiceError {
    fn from(source: TransformError) -> Self {
        ServiceError::UpstreamData {
            source,
            span: SpanTrace::capture(),
        }
    }
}

// =============================================================================
// ERROR TO API CONVERSION
// =============================================================================

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ERRORS_TOTAL.with_label_values(&[err.kind()]).inc();

        match err {
            ServiceError::ClientInput(details) => {
                log_warn!(
                    "ErrorHandler",
                    &format!("Rejected client input with {} issue(s)", details.issues().len()),
                    "client_input"
                );
                ApiError::validation_failed(details)
            }
            ServiceError::UpstreamFetch(upstream) => {
                tracing::error!(
                    error = %upstream,
                    source = ?std::error::Error::source(&upstream).map(|e| e.to_string()),
                    span_trace = %upstream.span(),
                    "Upstream fetch failed"
                );
                ApiError::fetch_failed()
            }
            ServiceError::UpstreamShape(details) => {
                log_warn!(
                    "ErrorHandler",
                    &format!(
                        "Upstream payload failed shape check with {} issue(s)",
                        details.issues().len()
                    ),
                    "upstream_shape"
                );
                ApiError::invalid_upstream_data(details)
            }
            ServiceError::UpstreamData { source, span } => {
                tracing::error!(error = %source, span_trace = %span, "Upstream data rejected");
                ApiError::invalid_upstream_date()
            }
        }
    }
}

// =============================================================================
// AXUM FRAMEWORK INTEGRATION
// =============================================================================

/// Allows Axum handlers to return `Result<_, ServiceError>`.
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status.status_code(), Json(self)).into_response()
    }
}
