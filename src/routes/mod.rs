// HTTP routes: Prometheus scrape endpoint plus small JSON helpers

mod http;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::registry::MetricsRegistry;

/// Conventional Prometheus scrape path.
pub const METRICS_PATH: &str = "/metrics";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) registry: MetricsRegistry,
}

pub fn app(registry: MetricsRegistry) -> Router {
    let state = AppState { registry };
    Router::new()
        .route("/", get(http::root_handler)) // GET /
        .route(METRICS_PATH, get(http::metrics_handler)) // GET /metrics
        .route("/api/containers", get(http::containers_handler)) // GET /api/containers
        .route("/version", get(http::version_handler)) // GET /version
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
