// GET handlers: metrics, containers, version

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};

use super::{AppState, METRICS_PATH};

/// Content type of the Prometheus text exposition format.
const TEXT_FORMAT: &str = "text/plain; version=0.0.4; charset=utf-8";

pub(super) async fn root_handler() -> impl IntoResponse {
    format!("Docker Stats Exporter: metrics at {METRICS_PATH}")
}

/// GET /metrics — current gauges for every container published so far.
pub(super) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.registry.encode() {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, operation = "encode_metrics", "metrics encoding failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// GET /api/containers — the same values as JSON, keyed by container name.
pub(super) async fn containers_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.registry.read_all())
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
