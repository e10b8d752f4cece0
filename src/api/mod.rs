use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::client::{BkMonitor, Transport};
use crate::error::Result;
use crate::metrics;

pub mod overview;
pub mod query;

/// Routes the calling endpoints use to reach the monitor.
pub fn router<T: Transport + 'static>(monitor: Arc<BkMonitor<T>>) -> Router {
    Router::new()
        .route("/api/v1/query", post(query::instant::<T>))
        .route("/api/v1/query_range", post(query::range::<T>))
        .route(
            "/api/v1/clusters/:cluster_id/overview",
            get(overview::cluster::<T>),
        )
        .route(
            "/api/v1/clusters/:cluster_id/nodes/:ip/overview",
            get(overview::node::<T>),
        )
        .route("/metrics", get(metrics_text))
        .route("/healthz", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(monitor)
}

async fn metrics_text() -> Result<String> {
    metrics::gather_text()
}
