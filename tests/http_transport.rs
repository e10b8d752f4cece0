use axum::{http::StatusCode, routing::post, Json, Router};
use bkmonitor_adapter::{get_first_value, BkMonitor, HttpTransport, Settings};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;

async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn monitor_for(host: String) -> BkMonitor<HttpTransport> {
    let settings = Settings {
        query_host: host,
        timeout: Duration::from_secs(5),
        ..Settings::default()
    };
    BkMonitor::new(HttpTransport::new(), settings)
}

/// Echoes the posted window back as a single time-first series.
async fn echo_window(Json(body): Json<Value>) -> Json<Value> {
    let end: i64 = body["end"].as_str().unwrap().parse().unwrap();
    Json(json!({
        "series": [{
            "group_keys": ["promql"],
            "group_values": [body["promql"]],
            "columns": ["_time", "_value"],
            "values": [[end - 60, 1], [end, body["step"]]]
        }]
    }))
}

#[tokio::test]
async fn test_range_query_against_backend() {
    let host = spawn_backend(Router::new().route("/query/ts/promql", post(echo_window))).await;
    let monitor = monitor_for(host);

    let resp = monitor.query_range("up", 1000, 4600, 60).await;

    assert_eq!(
        serde_json::to_value(&resp).unwrap(),
        json!({
            "data": {
                "resultType": "matrix",
                "result": [{
                    "metric": {"promql": "up"},
                    "values": [[4540, "1"], [4600, "60s"]]
                }]
            }
        })
    );
    assert_eq!(get_first_value(&resp, false), Some("60s".to_string()));
}

#[tokio::test]
async fn test_error_status_becomes_empty_matrix() {
    let app = Router::new().route(
        "/query/ts/promql",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let monitor = monitor_for(spawn_backend(app).await);

    let resp = monitor.query("up").await;
    assert!(resp.data.result.is_empty());
    assert_eq!(get_first_value(&resp, true), Some("0".to_string()));
}

#[tokio::test]
async fn test_unreachable_backend_becomes_empty_matrix() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let monitor = monitor_for(format!("http://{}", addr));
    let value = monitor.node_cpu_usage("BCS-K8S-40000", "10.0.0.1", "100").await;
    assert_eq!(value, "0");
}
