//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AnalyzerMode;
use crate::kernel::ServerDeps;
use crate::server::routes::{
    analyze_handler, analyze_sales_handler, analyze_task_handler, health_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: Arc<ServerDeps>,
    pub mode: AnalyzerMode,
}

/// Build the Axum application router
///
/// The sales route is only mounted when a price sheet is configured.
pub fn build_app(deps: Arc<ServerDeps>, mode: AnalyzerMode) -> Router {
    let has_prices = deps.prices.is_some();
    let app_state = AxumAppState { deps, mode };

    // CORS configuration - webhooks are called server-to-server, allow any origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/webhook/analyze", post(analyze_handler))
        .route("/webhook/analyze/task", post(analyze_task_handler));

    if has_prices {
        router = router.route("/webhook/analyze/sales", post(analyze_sales_handler));
    }

    router
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
