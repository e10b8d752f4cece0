use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use std::time::Instant;

use crate::error::{AdapterError, Result};

lazy_static! {
    // Backend call metrics, labelled by `query` / `query_range`
    pub static ref BACKEND_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "bkmonitor_requests_total",
        "Total number of queries sent to the monitor backend",
        &["kind"]
    ).unwrap();

    pub static ref BACKEND_FAILURES: IntCounterVec = register_int_counter_vec!(
        "bkmonitor_request_failures_total",
        "Queries whose transport failure was swallowed into an empty result",
        &["kind"]
    ).unwrap();

    pub static ref BACKEND_DURATION: HistogramVec = register_histogram_vec!(
        "bkmonitor_request_duration_seconds",
        "Monitor backend query duration in seconds",
        &["kind"],
        vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 120.0]
    ).unwrap();
}

/// Forces registration so `/metrics` lists the series before the first query.
pub fn init_metrics() {
    lazy_static::initialize(&BACKEND_REQUESTS);
    lazy_static::initialize(&BACKEND_FAILURES);
    lazy_static::initialize(&BACKEND_DURATION);
}

pub struct RequestTimer {
    kind: &'static str,
    start: Instant,
}

impl RequestTimer {
    pub fn new(kind: &'static str) -> Self {
        BACKEND_REQUESTS.with_label_values(&[kind]).inc();
        Self {
            kind,
            start: Instant::now(),
        }
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        BACKEND_DURATION
            .with_label_values(&[self.kind])
            .observe(duration);
    }
}

pub fn record_failure(kind: &str) {
    BACKEND_FAILURES.with_label_values(&[kind]).inc();
}

/// Renders the default registry in the text exposition format.
pub fn gather_text() -> Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| AdapterError::Internal(format!("Failed to encode metrics: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| AdapterError::Internal(format!("Metrics are not utf-8: {}", e)))
}
