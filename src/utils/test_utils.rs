//! Test utilities for the random user service.
//!
//! Provides canned upstream documents, a stub `RandomUserSource`, app state
//! builders and a helper for standing up a throwaway HTTP server.

#![cfg(test)]

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response, Router};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::upstream::RandomUserSource;
use crate::utils::errors::UpstreamError;

// =============================================================================
// CANNED DOCUMENTS
// =============================================================================

/// A trimmed but realistic random user API document.
pub fn sample_upstream_payload() -> Value {
    json!({
        "results": [{
            "gender": "female",
            "name": {"title": "Ms", "first": "Sandra", "last": "Lopez"},
            "location": {"city": "Valencia", "country": "Spain"},
            "email": "sandra.lopez@example.com",
            "login": {"uuid": "6f1c", "username": "bluebird212"},
            "registered": {"date": "2015-03-15T12:00:00.000Z", "age": 10}
        }],
        "info": {"seed": "abc", "results": 1, "page": 1, "version": "1.4"}
    })
}

// =============================================================================
// STUB SOURCE
// =============================================================================

enum StubReply {
    Document(Value),
    Status(u16),
    Malformed,
}

/// `RandomUserSource` returning a fixed reply and counting calls.
pub struct StubSource {
    reply: StubReply,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn document(document: Value) -> Self {
        Self::with(StubReply::Document(document))
    }

    pub fn status(status: u16) -> Self {
        Self::with(StubReply::Status(status))
    }

    pub fn malformed() -> Self {
        Self::with(StubReply::Malformed)
    }

    fn with(reply: StubReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RandomUserSource for StubSource {
    async fn fetch(&self) -> Result<Value, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            StubReply::Document(document) => Ok(document.clone()),
            StubReply::Status(status) => Err(UpstreamError::status(*status)),
            StubReply::Malformed => {
                let err = serde_json::from_str::<Value>("not json").unwrap_err();
                Err(UpstreamError::decode(err))
            }
        }
    }
}

// =============================================================================
// APP STATE BUILDERS
// =============================================================================

/// Creates an `AppState` around the given source.
pub fn state_with(source: Arc<dyn RandomUserSource>) -> Arc<AppState> {
    crate::utils::metrics::init();
    Arc::new(AppState { source })
}

/// Creates an `AppState` whose upstream returns `document`.
pub fn state_with_document(document: Value) -> Arc<AppState> {
    state_with(Arc::new(StubSource::document(document)))
}

// =============================================================================
// HTTP HELPERS
// =============================================================================

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(app: Router) -> String {
    let addr: SocketAddr = ([127, 0, 0, 1], 0).into();
    let server = axum::Server::bind(&addr).serve(app.into_make_service());
    let local = server.local_addr();
    tokio::spawn(server);
    format!("http://{local}")
}

/// Reads a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Builds an empty-bodied GET request.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Builds a POST request with a JSON content type and raw body.
pub fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}
