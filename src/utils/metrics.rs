//! Prometheus metrics for the random user service.
//!
//! Covers HTTP request measurements, schema validation outcomes, upstream
//! fetches and the error taxonomy. Everything is registered in the default
//! registry and exposed by `GET /metrics`.

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge, register_histogram, register_histogram_vec, CounterVec,
    Encoder, Gauge, Histogram, HistogramVec, TextEncoder,
};

// ===== HTTP Metrics =====
lazy_static! {
    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "rus_request_duration_seconds",
        "HTTP request duration in seconds",
        &["endpoint"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).expect("Failed to register REQUEST_DURATION");

    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "rus_requests_total",
        "Total number of HTTP requests",
        &["endpoint", "method", "status"] // endpoint: matched route only, "unmatched" otherwise
    ).expect("Failed to register REQUESTS_TOTAL");

    pub static ref ACTIVE_REQUESTS: Gauge = register_gauge!(
        "rus_active_requests",
        "Number of currently active requests"
    ).expect("Failed to register ACTIVE_REQUESTS");
}

// ===== Validation Metrics =====
lazy_static! {
    pub static ref VALIDATION_OPERATIONS: CounterVec = register_counter_vec!(
        "rus_validation_operations_total",
        "Number of schema validation operations",
        &["shape", "result"] // shape: "external_user", "external_login", "inbound_user"; result: "success", "failure"
    ).expect("Failed to register VALIDATION_OPERATIONS");
}

// ===== Upstream Metrics =====
lazy_static! {
    pub static ref UPSTREAM_FETCHES: CounterVec = register_counter_vec!(
        "rus_upstream_fetches_total",
        "Number of fetches against the random user API",
        &["outcome"] // outcome: "success", "transport", "timeout", "status", "decode"
    ).expect("Failed to register UPSTREAM_FETCHES");

    pub static ref UPSTREAM_FETCH_DURATION: Histogram = register_histogram!(
        "rus_upstream_fetch_duration_seconds",
        "Time spent waiting on the random user API",
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).expect("Failed to register UPSTREAM_FETCH_DURATION");
}

// ===== Error Metrics =====
lazy_static! {
    pub static ref ERRORS_TOTAL: CounterVec = register_counter_vec!(
        "rus_errors_total",
        "Number of failed requests by error kind",
        &["kind"] // kind: "client_input", "upstream_fetch", "upstream_shape", "upstream_data", "not_found", "method_not_allowed"
    ).expect("Failed to register ERRORS_TOTAL");
}

/// Forces registration of every metric so `/metrics` lists them from the
/// first scrape on.
pub fn init() {
    let _ = &*REQUEST_DURATION;
    let _ = &*REQUESTS_TOTAL;
    let _ = &*ACTIVE_REQUESTS;
    let _ = &*VALIDATION_OPERATIONS;
    let _ = &*UPSTREAM_FETCHES;
    let _ = &*UPSTREAM_FETCH_DURATION;
    let _ = &*ERRORS_TOTAL;
}

/// Records the outcome of one schema validation.
pub fn record_validation(shape: &str, success: bool) {
    let result = if success { "success" } else { "failure" };
    VALIDATION_OPERATIONS.with_label_values(&[shape, result]).inc();
}

/// Gathers metrics in Prometheus text format.
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Measures one HTTP request from arrival to response.
///
/// - Create with `RequestTimer::start(endpoint, method)`.
/// - Call `set_status()` once the response status is known.
/// - Metrics are always recorded on drop, even if the request future is
///   cancelled before completion.
pub struct RequestTimer {
    timer: Option<prometheus::HistogramTimer>,
    endpoint: String,
    method: String,
    status: String,
    completed: bool,
}

impl RequestTimer {
    pub fn start(endpoint: impl Into<String>, method: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let timer = REQUEST_DURATION
            .with_label_values(&[endpoint.as_str()])
            .start_timer();
        ACTIVE_REQUESTS.inc();
        Self {
            timer: Some(timer),
            endpoint,
            method: method.into(),
            status: "unknown".to_string(),
            completed: false,
        }
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status.to_string();
    }

    /// Completes the timer and records the request metrics.
    pub fn complete(mut self) {
        self.record();
        self.completed = true;
    }

    fn record(&mut self) {
        ACTIVE_REQUESTS.dec();
        REQUESTS_TOTAL
            .with_label_values(&[
                self.endpoint.as_str(),
                self.method.as_str(),
                self.status.as_str(),
            ])
            .inc();
        if let Some(timer) = self.timer.take() {
            timer.observe_duration();
        }
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        if !self.completed {
            self.record();
            self.completed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_timer_counts_request_once() {
        init();
        let before = REQUESTS_TOTAL
            .with_label_values(&["/timer-test", "GET", "204"])
            .get();

        let mut timer = RequestTimer::start("/timer-test", "GET");
        timer.set_status(204);
        timer.complete();

        let after = REQUESTS_TOTAL
            .with_label_values(&["/timer-test", "GET", "204"])
            .get();
        assert_eq!(after - before, 1.0);
    }

    #[test]
    fn dropped_timer_still_records() {
        init();
        let before = REQUESTS_TOTAL
            .with_label_values(&["/timer-drop", "GET", "unknown"])
            .get();

        {
            let _timer = RequestTimer::start("/timer-drop", "GET");
        }

        let after = REQUESTS_TOTAL
            .with_label_values(&["/timer-drop", "GET", "unknown"])
            .get();
        assert_eq!(after - before, 1.0);
    }

    #[test]
    fn gathered_metrics_include_registered_families() {
        init();
        record_validation("inbound_user", true);
        let text = gather_metrics().unwrap();
        assert!(text.contains("rus_validation_operations_total"));
    }
}
