use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::client::{BkMonitor, Transport};
use crate::models::{CapacityUsage, CpuUsage};

#[derive(Debug, Deserialize)]
pub struct ClusterOverviewParams {
    pub bk_biz_id: String,
    /// Comma separated node IPs.
    #[serde(default)]
    pub node_ips: String,
}

#[derive(Debug, Deserialize)]
pub struct NodeOverviewParams {
    pub bk_biz_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClusterOverview {
    pub cpu_usage: CpuUsage,
    pub memory_usage: CapacityUsage,
    pub disk_usage: CapacityUsage,
}

/// Usage percentages of a single node, as strings.
#[derive(Debug, Serialize, Deserialize)]
pub struct NodeOverview {
    pub cpu_usage: String,
    pub memory_usage: String,
    pub disk_usage: String,
    pub diskio_usage: String,
}

pub async fn cluster<T: Transport + 'static>(
    State(monitor): State<Arc<BkMonitor<T>>>,
    Path(cluster_id): Path<String>,
    Query(params): Query<ClusterOverviewParams>,
) -> Json<ClusterOverview> {
    let node_ips: Vec<&str> = params
        .node_ips
        .split(',')
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .collect();
    info!("Cluster overview: {} ({} nodes)", cluster_id, node_ips.len());

    let (cpu_usage, memory_usage, disk_usage) = tokio::join!(
        monitor.cluster_cpu_usage(&cluster_id, &node_ips, &params.bk_biz_id),
        monitor.cluster_memory_usage(&cluster_id, &node_ips, &params.bk_biz_id),
        monitor.cluster_disk_usage(&cluster_id, &node_ips, &params.bk_biz_id),
    );

    Json(ClusterOverview {
        cpu_usage,
        memory_usage,
        disk_usage,
    })
}

pub async fn node<T: Transport + 'static>(
    State(monitor): State<Arc<BkMonitor<T>>>,
    Path((cluster_id, ip)): Path<(String, String)>,
    Query(params): Query<NodeOverviewParams>,
) -> Json<NodeOverview> {
    info!("Node overview: {} {}", cluster_id, ip);

    let biz = params.bk_biz_id.as_str();
    let (cpu_usage, memory_usage, disk_usage, diskio_usage) = tokio::join!(
        monitor.node_cpu_usage(&cluster_id, &ip, biz),
        monitor.node_memory_usage(&cluster_id, &ip, biz),
        monitor.node_disk_usage(&cluster_id, &ip, biz),
        monitor.node_diskio_usage(&cluster_id, &ip, biz),
    );

    Json(NodeOverview {
        cpu_usage,
        memory_usage,
        disk_usage,
        diskio_usage,
    })
}

#[cfg(test)]
mod tests {
    use crate::api::tests::{app, call, json_body};
    use crate::client::testing::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_cluster_overview() {
        let request = Request::get(
            "/api/v1/clusters/BCS-K8S-40000/overview?bk_biz_id=100&node_ips=10.0.0.1,10.0.0.2",
        )
        .body(Body::empty())
        .unwrap();
        let (status, body) = call(app(RecordingTransport::answering(series_payload(8.0))), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!({
                "cpu_usage": {"used": "8.0", "total": "8.0"},
                "memory_usage": {"used_bytes": "8.0", "total_bytes": "8.0"},
                "disk_usage": {"used_bytes": "8.0", "total_bytes": "8.0"}
            })
        );
    }

    #[tokio::test]
    async fn test_node_overview_with_backend_down() {
        let request = Request::get("/api/v1/clusters/BCS-K8S-40000/nodes/10.0.0.1/overview?bk_biz_id=100")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(app(RecordingTransport::failing()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!({
                "cpu_usage": "0",
                "memory_usage": "0",
                "disk_usage": "0",
                "diskio_usage": "0"
            })
        );
    }
}
