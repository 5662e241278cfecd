use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::{
    ping::ping_handler,
    random_login::random_login_handler,
    random_person::random_person_handler,
    system::{method_not_allowed_handler, metrics_handler, not_found_handler},
    users::create_user_handler,
};
use crate::middleware::telemetry::telemetry_middleware;
use crate::upstream::RandomUserSource;

/// Shared, read-only state. Nothing in here is mutated by requests.
pub struct AppState {
    pub source: Arc<dyn RandomUserSource>,
}

/// Every routed path, used to keep metric labels bounded.
const ROUTES: &[&str] = &["/ping", "/random-person", "/random-login", "/users", "/metrics"];

/// Metric label for `path`: the route itself, or `unmatched`.
pub fn endpoint_label(path: &str) -> &'static str {
    ROUTES
        .iter()
        .find(|route| **route == path)
        .copied()
        .unwrap_or("unmatched")
}

pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ping", get(ping_handler).fallback(method_not_allowed_handler))
        .route(
            "/random-person",
            get(random_person_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/random-login",
            get(random_login_handler).fallback(method_not_allowed_handler),
        )
        .route("/users", post(create_user_handler).fallback(method_not_allowed_handler))
        .route("/metrics", get(metrics_handler).fallback(method_not_allowed_handler))
        .fallback(not_found_handler)
        .layer(middleware::from_fn(telemetry_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers(Any),
        )
        .with_state(state)
}
