//! Liveness check.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Pong {
    pub message: &'static str,
}

/// `GET /ping`. Never fails and touches nothing.
pub async fn ping_handler() -> Json<Pong> {
    Json(Pong { message: "pong" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answers_pong() {
        let Json(body) = ping_handler().await;
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"message": "pong"})
        );
    }
}
