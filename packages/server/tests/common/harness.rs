//! Test harness for HTTP-level integration tests.
//!
//! Builds the real router over mock services and drives it in-process with
//! `tower::ServiceExt::oneshot`, so no port is bound.

use std::sync::Arc;
use std::time::Duration;

use analyzer_core::kernel::{MockAI, MockPriceSource, ServerDeps};
use analyzer_core::server::build_app;
use analyzer_core::AnalyzerMode;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

/// Router plus handles to the mocks behind it.
pub struct TestHarness {
    pub app: Router,
    pub ai: Arc<MockAI>,
    pub prices: Option<Arc<MockPriceSource>>,
}

impl TestHarness {
    /// Task analyzer without a price sheet.
    pub fn task(ai: MockAI) -> Self {
        Self::build(ai, None, AnalyzerMode::Task, Duration::from_secs(600))
    }

    /// Sales analyzer over `prices` with the given cache TTL.
    pub fn sales(ai: MockAI, prices: MockPriceSource, ttl: Duration) -> Self {
        Self::build(ai, Some(prices), AnalyzerMode::Sales, ttl)
    }

    pub fn build(
        ai: MockAI,
        prices: Option<MockPriceSource>,
        mode: AnalyzerMode,
        ttl: Duration,
    ) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let ai = Arc::new(ai);
        let prices = prices.map(Arc::new);

        let mut deps = ServerDeps::for_tests(ai.clone()).with_price_ttl(ttl);
        if let Some(source) = &prices {
            deps = deps.with_price_source(source.clone());
        }

        Self {
            app: build_app(Arc::new(deps), mode),
            ai,
            prices,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .expect("valid request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }
}
