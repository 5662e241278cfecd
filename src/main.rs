//! Random user service entry point.
//!
//! A small HTTP service with four routes:
//!
//! - `GET /ping`: liveness check
//! - `GET /random-person`: fetches a random user upstream and returns
//!   `{ fullName, country }`
//! - `GET /random-login`: fetches a random user upstream and returns
//!   `{ username, registeredDate, summary }`
//! - `POST /users`: validates a user record and echoes it normalized
//!
//! plus `GET /metrics` for Prometheus.
//!
//! # Startup Sequence
//!
//! 1. Initialize observability (metrics, logging)
//! 2. Load configuration from the environment
//! 3. Build the upstream HTTP client
//! 4. Build the HTTP application with routes and middleware
//! 5. Serve until Ctrl+C or SIGTERM, then drain in-flight requests

use axum::Server;
use dotenvy::dotenv;
use std::{env, net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{error, info};
use tracing_appender::non_blocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::app::{build_app, AppState};
use crate::config::upstream::UpstreamConfig;
use crate::upstream::HttpRandomUserSource;
use crate::utils::metrics;

mod app;
mod config;
mod handlers;
mod middleware;
mod schema;
mod transform;
mod upstream;
mod utils;

/// Default port if not specified in environment
const DEFAULT_PORT: u16 = 3000;

/// Default host address if not specified in environment
const DEFAULT_HOST: &str = "127.0.0.1";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    metrics::init();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = setup_logging();
    info!(
        service = utils::log::SERVICE_NAME,
        version = env!("CARGO_PKG_VERSION"),
        "Server initialization: logging & metrics configured"
    );

    dotenv().ok();
    info!("Server initialization: environment loaded");

    let upstream_config = UpstreamConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid upstream configuration");
        e
    })?;
    let source = HttpRandomUserSource::new(&upstream_config).map_err(|e| {
        error!(error = %e, "Failed to build upstream HTTP client");
        e
    })?;
    info!(
        endpoint = %upstream_config.endpoint,
        timeout_secs = upstream_config.timeout.as_secs(),
        "Server initialization: upstream client ready"
    );

    let state = Arc::new(AppState {
        source: Arc::new(source),
    });
    let app = build_app(state);
    info!("Server initialization: application built");

    let addr = get_server_address()?;
    info!(address = %addr, "Server startup: listening");

    Server::try_bind(&addr)
        .map_err(|e| {
            error!(error = %e, address = %addr, "Failed to bind");
            e
        })?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown: complete");
    Ok(())
}

/// Sets up structured JSON logging on a non-blocking stdout writer.
///
/// Level comes from `RUST_LOG`, defaulting to `info`.
fn setup_logging() -> WorkerGuard {
    let (writer, guard) = non_blocking(std::io::stdout());

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    Registry::default()
        .with(filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();

    guard
}

/// Determine server binding address from `HOST` and `PORT`, falling back
/// to 127.0.0.1:3000.
fn get_server_address() -> Result<SocketAddr, std::net::AddrParseError> {
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

    format!("{}:{}", host, port).parse()
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received: Ctrl+C"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Shutdown signal received: SIGTERM");
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = sigterm => {},
    }

    info!("Starting graceful shutdown, waiting for in-flight requests");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests below mutate process-wide environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_get_server_address_default() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::remove_var("HOST");
        env::remove_var("PORT");

        let addr = get_server_address().unwrap();
        assert_eq!(
            addr.to_string(),
            format!("{}:{}", DEFAULT_HOST, DEFAULT_PORT)
        );
    }

    #[test]
    fn test_get_server_address_custom() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::set_var("HOST", "0.0.0.0");
        env::set_var("PORT", "8080");

        let addr = get_server_address().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:8080");

        env::remove_var("HOST");
        env::remove_var("PORT");
    }

    #[test]
    fn test_get_server_address_bad_port_falls_back() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::remove_var("HOST");
        env::set_var("PORT", "not-a-port");

        let addr = get_server_address().unwrap();
        assert_eq!(addr.port(), DEFAULT_PORT);

        env::remove_var("PORT");
    }
}
