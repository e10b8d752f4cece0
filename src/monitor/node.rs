use crate::client::{BkMonitor, Transport};
use crate::models::PromData;
use crate::normalize::first_value_or_zero;
use crate::promql::range_step;

fn node_info_query(cluster_id: &str, ip: &str, fstype: &str, mountpoint: &str) -> String {
    [
        format!(r#"cadvisor_version_info{{cluster_id="{cluster_id}", instance=~"{ip}:\\d+"}}"#),
        format!(
            r#"node_uname_info{{cluster_id="{cluster_id}", job="node-exporter", instance=~"{ip}:\\d+"}}"#
        ),
        format!(
            r#"label_replace(sum by (instance) (count without(cpu, mode) (node_cpu_seconds_total{{cluster_id="{cluster_id}", job="node-exporter", mode="idle", instance=~"{ip}:\\d+"}})), "metric_name", "cpu_count", "instance", ".*")"#
        ),
        format!(
            r#"label_replace(sum by (instance) (node_memory_MemTotal_bytes{{cluster_id="{cluster_id}", job="node-exporter", instance=~"{ip}:\\d+"}}), "metric_name", "memory", "instance", ".*")"#
        ),
        format!(
            r#"label_replace(sum by (instance) (node_filesystem_size_bytes{{cluster_id="{cluster_id}", job="node-exporter", instance=~"{ip}:\\d+", fstype=~"{fstype}", mountpoint=~"{mountpoint}"}}), "metric_name", "disk", "instance", ".*")"#
        ),
    ]
    .join(" or ")
}

fn container_pod_count_query(cluster_id: &str, ip: &str) -> String {
    [
        format!(
            r#"label_replace(sum by (instance) ({{__name__="kubelet_running_container_count", cluster_id="{cluster_id}", instance=~"{ip}:\\d+"}}), "metric_name", "container_count", "instance", ".*")"#
        ),
        format!(
            r#"label_replace(sum by (instance) ({{__name__="kubelet_running_pod_count", cluster_id="{cluster_id}", instance=~"{ip}:\\d+"}}), "metric_name", "pod_count", "instance", ".*")"#
        ),
    ]
    .join(" or ")
}

fn cpu_usage_query(bk_biz_id: &str, ip: &str) -> String {
    format!(
        r#"sum(bkmonitor:system:cpu_detail:usage{{bk_biz_id="{bk_biz_id}", ip="{ip}"}}) / count(bkmonitor:system:cpu_detail:usage{{bk_biz_id="{bk_biz_id}", ip="{ip}"}})"#
    )
}

fn memory_usage_query(bk_biz_id: &str, ip: &str) -> String {
    format!(
        r#"(sum(bkmonitor:system:mem:used{{bk_biz_id="{bk_biz_id}", ip="{ip}"}}) / sum(bkmonitor:system:mem:total{{bk_biz_id="{bk_biz_id}", ip="{ip}"}})) * 100"#
    )
}

fn disk_usage_query(bk_biz_id: &str, ip: &str, mountpoint: &str) -> String {
    format!(
        r#"(sum(bkmonitor:system:disk:used{{bk_biz_id="{bk_biz_id}", mount_point=~"{mountpoint}", ip="{ip}"}}) / sum(bkmonitor:system:disk:total{{bk_biz_id="{bk_biz_id}", mount_point=~"{mountpoint}", ip="{ip}"}})) * 100"#
    )
}

fn network_query(direction: &str, bk_biz_id: &str, ip: &str) -> String {
    format!(r#"max(bkmonitor:system:net:speed_{direction}{{bk_biz_id="{bk_biz_id}", ip="{ip}"}})"#)
}

fn diskio_query(bk_biz_id: &str, ip: &str) -> String {
    format!(r#"max(bkmonitor:system:io:util{{bk_biz_id="{bk_biz_id}", ip="{ip}"}}) * 100"#)
}

/// Node level metrics. Ranged operations take `start`/`end` in the caller's
/// unit (milliseconds for the node charts) and sample sixty points.
impl<T: Transport> BkMonitor<T> {
    /// Runtime versions, uname and cpu/memory/disk capacity of one node.
    pub async fn node_info(&self, cluster_id: &str, ip: &str, _bk_biz_id: &str) -> PromData {
        let settings = self.settings();
        let promql = node_info_query(
            cluster_id,
            ip,
            &settings.disk_fstype,
            &settings.disk_mountpoint,
        );
        self.query(&promql).await.data
    }

    /// Running containers and pods reported by the node's kubelet.
    pub async fn container_pod_count(&self, cluster_id: &str, ip: &str, _bk_biz_id: &str) -> PromData {
        self.query(&container_pod_count_query(cluster_id, ip)).await.data
    }

    /// Uses the caller's `bk_biz_id`; no business id is pinned for this query.
    pub async fn node_cpu_usage(&self, _cluster_id: &str, ip: &str, bk_biz_id: &str) -> String {
        first_value_or_zero(&self.query(&cpu_usage_query(bk_biz_id, ip)).await)
    }

    pub async fn node_cpu_usage_range(
        &self,
        _cluster_id: &str,
        ip: &str,
        start: i64,
        end: i64,
        bk_biz_id: &str,
    ) -> PromData {
        self.query_range(&cpu_usage_query(bk_biz_id, ip), start, end, range_step(start, end))
            .await
            .data
    }

    pub async fn node_memory_usage(&self, _cluster_id: &str, ip: &str, bk_biz_id: &str) -> String {
        first_value_or_zero(&self.query(&memory_usage_query(bk_biz_id, ip)).await)
    }

    pub async fn node_memory_usage_range(
        &self,
        _cluster_id: &str,
        ip: &str,
        start: i64,
        end: i64,
        bk_biz_id: &str,
    ) -> PromData {
        self.query_range(&memory_usage_query(bk_biz_id, ip), start, end, range_step(start, end))
            .await
            .data
    }

    pub async fn node_disk_usage(&self, _cluster_id: &str, ip: &str, bk_biz_id: &str) -> String {
        let promql = disk_usage_query(bk_biz_id, ip, &self.settings().disk_mountpoint);
        first_value_or_zero(&self.query(&promql).await)
    }

    /// Received bytes in KB/s.
    pub async fn node_network_receive(
        &self,
        _cluster_id: &str,
        ip: &str,
        start: i64,
        end: i64,
        bk_biz_id: &str,
    ) -> PromData {
        self.query_range(&network_query("recv", bk_biz_id, ip), start, end, range_step(start, end))
            .await
            .data
    }

    pub async fn node_network_transmit(
        &self,
        _cluster_id: &str,
        ip: &str,
        start: i64,
        end: i64,
        bk_biz_id: &str,
    ) -> PromData {
        self.query_range(&network_query("send", bk_biz_id, ip), start, end, range_step(start, end))
            .await
            .data
    }

    /// Current disk IO utilisation percentage.
    pub async fn node_diskio_usage(&self, _cluster_id: &str, ip: &str, bk_biz_id: &str) -> String {
        first_value_or_zero(&self.query(&diskio_query(bk_biz_id, ip)).await)
    }

    pub async fn node_diskio_usage_range(
        &self,
        _cluster_id: &str,
        ip: &str,
        start: i64,
        end: i64,
        bk_biz_id: &str,
    ) -> PromData {
        self.query_range(&diskio_query(bk_biz_id, ip), start, end, range_step(start, end))
            .await
            .data
    }
}
