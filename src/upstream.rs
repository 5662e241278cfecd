//! Client for the third-party random user API.
//!
//! The adapter owns transport details only: one GET per call, timeout and
//! HTTP status mapping, and JSON decoding. Interpreting the document is left
//! to the schema layer.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::Level;
use url::Url;

use crate::config::upstream::UpstreamConfig;
use crate::utils::errors::UpstreamError;
use crate::utils::metrics::{UPSTREAM_FETCHES, UPSTREAM_FETCH_DURATION};
use crate::{log_debug, log_info};

/// Source of raw random user documents.
#[async_trait]
pub trait RandomUserSource: Send + Sync {
    /// Fetches one document. Exactly one attempt; no retries.
    async fn fetch(&self) -> Result<Value, UpstreamError>;
}

/// `RandomUserSource` backed by HTTPS requests.
pub struct HttpRandomUserSource {
    client: Client,
    endpoint: Url,
}

impl HttpRandomUserSource {
    /// Builds the adapter with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    async fn fetch_once(&self) -> Result<Value, UpstreamError> {
        log_debug!(
            "Upstream",
            &format!("Fetching random user from {}", self.endpoint),
            "started"
        );
        let response = self.client.get(self.endpoint.clone()).send().await?;

        let status = response.status();
        log_debug!(
            "Upstream",
            &format!("Upstream responded with {}", status),
            "received"
        );
        if !status.is_success() {
            return Err(UpstreamError::status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let document: Value = serde_json::from_slice(&body).map_err(UpstreamError::decode)?;
        if tracing::enabled!(Level::DEBUG) {
            log_debug!("Upstream", &document.to_string(), "body");
        }
        Ok(document)
    }
}

#[async_trait]
impl RandomUserSource for HttpRandomUserSource {
    async fn fetch(&self) -> Result<Value, UpstreamError> {
        let started = Instant::now();
        let result = self.fetch_once().await;
        UPSTREAM_FETCH_DURATION.observe(started.elapsed().as_secs_f64());

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.outcome(),
        };
        UPSTREAM_FETCHES.with_label_values(&[outcome]).inc();
        if result.is_ok() {
            log_info!("Upstream", "Fetched random user document", outcome);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{sample_upstream_payload, spawn_upstream};
    use axum::{http::StatusCode, routing::get, Json, Router};
    use std::time::Duration;

    fn source_for(base: &str, timeout_secs: u64) -> HttpRandomUserSource {
        let config = UpstreamConfig::new(base, timeout_secs).unwrap();
        HttpRandomUserSource::new(&config).unwrap()
    }

    #[tokio::test]
    async fn returns_decoded_document() {
        let app = Router::new().route("/api/", get(|| async { Json(sample_upstream_payload()) }));
        let base = spawn_upstream(app).await;

        let document = source_for(&format!("{base}/api/"), 5).fetch().await.unwrap();
        assert_eq!(document, sample_upstream_payload());
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let app = Router::new().route(
            "/api/",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        );
        let base = spawn_upstream(app).await;

        let err = source_for(&format!("{base}/api/"), 5).fetch().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let app = Router::new().route("/api/", get(|| async { "<html>oops</html>" }));
        let base = spawn_upstream(app).await;

        let err = source_for(&format!("{base}/api/"), 5).fetch().await.unwrap_err();
        assert_eq!(err.outcome(), "decode");
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let app = Router::new().route(
            "/api/",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(sample_upstream_payload())
            }),
        );
        let base = spawn_upstream(app).await;

        let err = source_for(&format!("{base}/api/"), 1).fetch().await.unwrap_err();
        assert_eq!(err.outcome(), "timeout");
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_transport_error() {
        // Port 9 (discard) is closed on test machines.
        let err = source_for("http://127.0.0.1:9/api/", 2).fetch().await.unwrap_err();
        assert!(matches!(
            err,
            UpstreamError::Transport { .. } | UpstreamError::Timeout { .. }
        ));
    }
}
