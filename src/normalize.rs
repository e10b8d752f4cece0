//! Conversion of monitor backend responses into the Prometheus matrix shape.

use serde_json::Value;
use tracing::warn;

use crate::models::{MatrixSeries, NativeResponse, PromData, PromResponse, Sample, Series};

const VALUE_COLUMN: &str = "_value";

/// Position of the value and the timestamp inside a raw row.
///
/// The backend does not keep its column order stable between calls, so the
/// order is detected per series from its `columns` descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOrder {
    ValueFirst,
    TimeFirst,
}

impl ColumnOrder {
    pub fn detect(columns: &[String]) -> Self {
        match columns.first() {
            Some(first) if first == VALUE_COLUMN => ColumnOrder::ValueFirst,
            _ => ColumnOrder::TimeFirst,
        }
    }

    /// Returns `(value_index, timestamp_index)`.
    pub fn indices(self) -> (usize, usize) {
        match self {
            ColumnOrder::ValueFirst => (0, 1),
            ColumnOrder::TimeFirst => (1, 0),
        }
    }
}

/// Converts a raw backend payload into a Prometheus matrix envelope.
///
/// Anything that does not carry a `series` list, including error payloads,
/// becomes an empty matrix.
pub fn bkmonitor_resp2prom(response: &Value) -> PromResponse {
    let native: NativeResponse = match serde_json::from_value(response.clone()) {
        Ok(native) => native,
        Err(e) => {
            warn!("Unexpected monitor response shape: {}", e);
            NativeResponse::default()
        }
    };

    let result = native
        .series
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match serde_json::from_value::<Series>(raw) {
            Ok(series) => Some(convert_series(series)),
            Err(e) => {
                warn!("Skipping malformed series #{}: {}", index, e);
                None
            }
        })
        .collect();

    PromResponse {
        data: PromData {
            result,
            ..PromData::default()
        },
    }
}

fn convert_series(series: Series) -> MatrixSeries {
    let metric = series
        .group_keys
        .into_iter()
        .zip(series.group_values.iter().map(render_value))
        .collect();

    let (value_index, timestamp_index) = ColumnOrder::detect(&series.columns).indices();

    let mut values = Vec::with_capacity(series.values.len());
    for row in series.values {
        let mut row = match row {
            Value::Array(cells) if cells.len() >= 2 => cells,
            other => {
                warn!("Skipping malformed sample row: {}", other);
                continue;
            }
        };
        let value = render_value(&row[value_index]);
        let timestamp = row.swap_remove(timestamp_index);
        values.push(Sample(timestamp, value));
    }

    MatrixSeries { metric, values }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "NaN".to_string(),
        other => other.to_string(),
    }
}

/// Returns the value of the last sample of the first series.
///
/// With nothing to report this is `"0"` when `fill_zero` is set, matching
/// how Prometheus renders a missing scalar, and `None` otherwise.
pub fn get_first_value(resp: &PromResponse, fill_zero: bool) -> Option<String> {
    let last = resp
        .data
        .result
        .first()
        .and_then(|series| series.values.last());

    match last {
        Some(Sample(_, value)) => Some(value.clone()),
        None if fill_zero => Some("0".to_string()),
        None => None,
    }
}

/// `get_first_value` with zero filling, the form every summary uses.
pub fn first_value_or_zero(resp: &PromResponse) -> String {
    get_first_value(resp, true).unwrap_or_else(|| "0".to_string())
}
