use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// JSON body posted to `/query/ts/promql`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBody {
    pub promql: String,
    pub start: String,
    pub end: String,
    pub step: String,
}

impl QueryBody {
    pub fn new(promql: &str, start: i64, end: i64, step: i64) -> Self {
        Self {
            promql: promql.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            step: format!("{}s", step),
        }
    }
}

/// Backend response as the monitor returns it.
#[derive(Debug, Default, Deserialize)]
pub struct NativeResponse {
    /// Decoded series by series so one malformed entry cannot hide the rest.
    #[serde(default)]
    pub series: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub group_keys: Vec<String>,
    /// Label values are usually strings, but numeric ones (`le`) occur.
    #[serde(default)]
    pub group_values: Vec<Value>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub values: Vec<Value>,
}

/// Prometheus style envelope handed to callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromResponse {
    #[serde(default)]
    pub data: PromData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromData {
    #[serde(rename = "resultType")]
    pub result_type: String,
    #[serde(default)]
    pub result: Vec<MatrixSeries>,
}

impl Default for PromData {
    fn default() -> Self {
        Self {
            result_type: "matrix".to_string(),
            result: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixSeries {
    pub metric: BTreeMap<String, String>,
    pub values: Vec<Sample>,
}

/// One `[timestamp, "value"]` pair; the timestamp is kept as the backend sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample(pub Value, pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuUsage {
    pub used: String,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityUsage {
    pub used_bytes: String,
    pub total_bytes: String,
}

/// Capacity left on a legacy scheduler resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainUsage {
    pub total: String,
    pub remain: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_query_body_rendering() {
        let body = QueryBody::new("up", 1700000000, 1700000300, 60);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "promql": "up",
                "start": "1700000000",
                "end": "1700000300",
                "step": "60s"
            })
        );
    }

    #[test]
    fn test_native_response_tolerates_missing_fields() {
        let resp: NativeResponse = serde_json::from_value(json!({"series": null})).unwrap();
        assert!(resp.series.is_none());

        let series: Series =
            serde_json::from_value(json!({"columns": ["_time", "_value"]})).unwrap();
        assert_eq!(series.columns, vec!["_time", "_value"]);
        assert!(series.values.is_empty());
    }

    #[test]
    fn test_sample_serializes_as_pair() {
        let sample = Sample(json!(100), "1".to_string());
        assert_eq!(serde_json::to_value(&sample).unwrap(), json!([100, "1"]));
    }
}
