use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::client::{BkMonitor, Transport};
use crate::error::{AdapterError, Result};
use crate::models::PromResponse;

#[derive(Debug, Serialize, Deserialize)]
pub struct InstantQueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RangeQueryRequest {
    pub query: String,
    pub start: i64,
    pub end: i64,
    /// Seconds between samples.
    pub step: i64,
}

fn require_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(AdapterError::BadRequest("query must not be empty".to_string()));
    }
    Ok(())
}

pub async fn instant<T: Transport + 'static>(
    State(monitor): State<Arc<BkMonitor<T>>>,
    Json(request): Json<InstantQueryRequest>,
) -> Result<Json<PromResponse>> {
    require_query(&request.query)?;
    info!("Instant query: {}", request.query);
    Ok(Json(monitor.query(&request.query).await))
}

pub async fn range<T: Transport + 'static>(
    State(monitor): State<Arc<BkMonitor<T>>>,
    Json(request): Json<RangeQueryRequest>,
) -> Result<Json<PromResponse>> {
    require_query(&request.query)?;
    if request.step <= 0 {
        return Err(AdapterError::BadRequest(format!(
            "step must be positive, got {}",
            request.step
        )));
    }
    if request.end < request.start {
        return Err(AdapterError::BadRequest(format!(
            "end {} is before start {}",
            request.end, request.start
        )));
    }

    info!(
        "Range query: {} [{}, {}] step {}s",
        request.query, request.start, request.end, request.step
    );
    Ok(Json(
        monitor
            .query_range(&request.query, request.start, request.end, request.step)
            .await,
    ))
}

#[cfg(test)]
mod tests {
    use crate::api::tests::{app, call, json_body};
    use crate::client::testing::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_range_query_returns_matrix() {
        let request = post(
            "/api/v1/query_range",
            json!({"query": "up", "start": 0, "end": 120, "step": 60}),
        );
        let (status, body) = call(app(RecordingTransport::answering(series_payload(2.0))), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!({
                "data": {
                    "resultType": "matrix",
                    "result": [{
                        "metric": {"instance": "10.0.0.1"},
                        "values": [[1700000000000i64, "0.5"], [1700000060000i64, "2.0"]]
                    }]
                }
            })
        );
    }

    #[tokio::test]
    async fn test_instant_query_with_backend_down() {
        let request = post("/api/v1/query", json!({"query": "up"}));
        let (status, body) = call(app(RecordingTransport::failing()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!({"data": {"resultType": "matrix", "result": []}})
        );
    }

    #[tokio::test]
    async fn test_rejects_bad_requests() {
        for body in [
            json!({"query": " ", "start": 0, "end": 60, "step": 60}),
            json!({"query": "up", "start": 0, "end": 60, "step": 0}),
            json!({"query": "up", "start": 60, "end": 0, "step": 60}),
        ] {
            let (status, body) = call(
                app(RecordingTransport::failing()),
                post("/api/v1/query_range", body),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(json_body(&body)["error"].is_string());
        }
    }
}
