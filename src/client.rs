use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{AdapterError, Result};
use crate::metrics::{self, RequestTimer};
use crate::models::{PromResponse, QueryBody};
use crate::normalize::bkmonitor_resp2prom;

/// The backend keeps no instantaneous endpoint, so point queries look back
/// this far and keep the newest sample.
pub const POINT_LOOKBACK_SECS: i64 = 300;
pub const POINT_STEP_SECS: i64 = 60;

/// Outbound JSON POST used to reach the monitor backend.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value, timeout: Duration) -> Result<Value>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value, timeout: Duration) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .json(body)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Client for the monitor's PromQL endpoint.
///
/// Queries never fail: any transport problem is logged and turned into an
/// error payload, which normalizes to an empty matrix. Callers therefore
/// cannot tell an unreachable backend from one with no data.
pub struct BkMonitor<T> {
    transport: T,
    settings: Settings,
}

impl<T: Transport> BkMonitor<T> {
    pub fn new(transport: T, settings: Settings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Range query over an explicit window.
    pub async fn query_range(&self, promql: &str, start: i64, end: i64, step: i64) -> PromResponse {
        let body = QueryBody::new(promql, start, end, step);
        info!("prometheus query_range: {:?}", body);
        let raw = self.post("query_range", &body).await;
        bkmonitor_resp2prom(&raw)
    }

    /// Point query: the last five minutes at a one minute step.
    pub async fn query(&self, promql: &str) -> PromResponse {
        let end = now_secs();
        let body = QueryBody::new(promql, end - POINT_LOOKBACK_SECS, end, POINT_STEP_SECS);
        info!("prometheus query: {:?}", body);
        let raw = self.post("query", &body).await;
        debug!("prometheus query response: {}", raw);
        bkmonitor_resp2prom(&raw)
    }

    async fn post(&self, kind: &'static str, body: &QueryBody) -> Value {
        let _timer = RequestTimer::new(kind);
        let url = self.settings.query_url();

        let result = match serde_json::to_value(body) {
            Ok(payload) => {
                self.transport
                    .post_json(&url, &payload, self.settings.timeout)
                    .await
            }
            Err(e) => Err(e.into()),
        };

        result.unwrap_or_else(|e| {
            warn!("{} to {} failed: {}", kind, url, e);
            metrics::record_failure(kind);
            error_payload(&e)
        })
    }
}

fn error_payload(err: &AdapterError) -> Value {
    json!({
        "result": false,
        "message": err.to_string(),
    })
}

pub(crate) fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_query_range_posts_window_as_given() {
        let monitor = monitor(RecordingTransport::answering(series_payload(1.0)));
        let resp = monitor.query_range("up", 1000, 4600, 60).await;

        let requests = monitor.transport().requests.lock().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "http://127.0.0.1:10205/query/ts/promql");
        assert_eq!(
            requests[0].1,
            json!({"promql": "up", "start": "1000", "end": "4600", "step": "60s"})
        );
        assert_eq!(resp.data.result.len(), 1);
    }

    #[tokio::test]
    async fn test_query_looks_back_five_minutes() {
        let monitor = monitor(RecordingTransport::answering(series_payload(3.0)));
        let before = now_secs();
        let resp = monitor.query("up").await;
        let after = now_secs();

        let bodies = monitor.transport().bodies();
        let body = &bodies[0];
        let start: i64 = body.start.parse().unwrap();
        let end: i64 = body.end.parse().unwrap();
        assert_eq!(end - start, POINT_LOOKBACK_SECS);
        assert!(end >= before && end <= after);
        assert_eq!(body.step, "60s");
        assert_eq!(resp.data.result[0].values.last().unwrap().1, "3.0");
    }

    #[test_log::test(tokio::test)]
    async fn test_transport_failure_is_swallowed() {
        let monitor = monitor(RecordingTransport::failing());
        let before = metrics::BACKEND_FAILURES.with_label_values(&["query_range"]).get();

        let resp = monitor.query_range("up", 0, 60, 1).await;

        assert_eq!(resp, PromResponse::default());
        assert!(metrics::BACKEND_FAILURES.with_label_values(&["query_range"]).get() > before);
    }
}
