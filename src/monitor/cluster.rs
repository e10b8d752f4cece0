use super::{CLUSTER_RANGE_SECS, CLUSTER_RANGE_STEP};
use crate::client::{now_secs, BkMonitor, Transport};
use crate::models::{CapacityUsage, CpuUsage, PromData};
use crate::normalize::first_value_or_zero;
use crate::promql::join_alternation;

fn cpu_used_query(bk_biz_id: &str, ips: &str) -> String {
    format!(r#"sum(bkmonitor:system:cpu_detail:usage{{bk_biz_id="{bk_biz_id}", ip=~"{ips}"}}) / 100"#)
}

fn cpu_count_query(bk_biz_id: &str, ips: &str) -> String {
    format!(r#"count(bkmonitor:system:cpu_detail:usage{{bk_biz_id="{bk_biz_id}", ip=~"{ips}"}})"#)
}

fn cpu_usage_ratio_query(bk_biz_id: &str, ips: &str) -> String {
    format!(
        r#"sum(bkmonitor:system:cpu_detail:usage{{bk_biz_id="{bk_biz_id}", ip=~"{ips}"}}) / count(bkmonitor:system:cpu_detail:usage{{bk_biz_id="{bk_biz_id}", ip=~"{ips}"}})"#
    )
}

fn mem_query(field: &str, bk_biz_id: &str, ips: &str) -> String {
    format!(r#"sum(bkmonitor:system:mem:{field}{{bk_biz_id="{bk_biz_id}", ip=~"{ips}"}})"#)
}

fn disk_query(field: &str, bk_biz_id: &str, mountpoint: &str, ips: &str) -> String {
    format!(
        r#"sum(bkmonitor:system:disk:{field}{{bk_biz_id="{bk_biz_id}", mount_point=~"{mountpoint}", ip=~"{ips}"}})"#
    )
}

impl<T: Transport> BkMonitor<T> {
    /// Used and total cores across the given nodes.
    pub async fn cluster_cpu_usage<S: AsRef<str>>(
        &self,
        _cluster_id: &str,
        node_ip_list: &[S],
        bk_biz_id: &str,
    ) -> CpuUsage {
        let ips = join_alternation(node_ip_list);
        CpuUsage {
            used: first_value_or_zero(&self.query(&cpu_used_query(bk_biz_id, &ips)).await),
            total: first_value_or_zero(&self.query(&cpu_count_query(bk_biz_id, &ips)).await),
        }
    }

    /// Average CPU usage percentage over the last hour.
    pub async fn cluster_cpu_usage_range<S: AsRef<str>>(
        &self,
        _cluster_id: &str,
        node_ip_list: &[S],
        bk_biz_id: &str,
    ) -> PromData {
        let ips = join_alternation(node_ip_list);
        self.last_hour(&cpu_usage_ratio_query(bk_biz_id, &ips)).await
    }

    pub async fn cluster_memory_usage<S: AsRef<str>>(
        &self,
        _cluster_id: &str,
        node_ip_list: &[S],
        bk_biz_id: &str,
    ) -> CapacityUsage {
        let ips = join_alternation(node_ip_list);
        CapacityUsage {
            used_bytes: first_value_or_zero(&self.query(&mem_query("used", bk_biz_id, &ips)).await),
            total_bytes: first_value_or_zero(
                &self.query(&mem_query("total", bk_biz_id, &ips)).await,
            ),
        }
    }

    /// Memory usage percentage over the last hour.
    pub async fn cluster_memory_usage_range<S: AsRef<str>>(
        &self,
        _cluster_id: &str,
        node_ip_list: &[S],
        bk_biz_id: &str,
    ) -> PromData {
        let ips = join_alternation(node_ip_list);
        let promql = format!(
            "({} / {}) * 100",
            mem_query("used", bk_biz_id, &ips),
            mem_query("total", bk_biz_id, &ips)
        );
        self.last_hour(&promql).await
    }

    pub async fn cluster_disk_usage<S: AsRef<str>>(
        &self,
        _cluster_id: &str,
        node_ip_list: &[S],
        bk_biz_id: &str,
    ) -> CapacityUsage {
        let ips = join_alternation(node_ip_list);
        let mountpoint = &self.settings().disk_mountpoint;
        CapacityUsage {
            used_bytes: first_value_or_zero(
                &self.query(&disk_query("used", bk_biz_id, mountpoint, &ips)).await,
            ),
            total_bytes: first_value_or_zero(
                &self.query(&disk_query("total", bk_biz_id, mountpoint, &ips)).await,
            ),
        }
    }

    /// Disk usage ratio over the last hour.
    pub async fn cluster_disk_usage_range<S: AsRef<str>>(
        &self,
        _cluster_id: &str,
        node_ip_list: &[S],
        bk_biz_id: &str,
    ) -> PromData {
        let ips = join_alternation(node_ip_list);
        let mountpoint = &self.settings().disk_mountpoint;
        let promql = format!(
            "{} / {}",
            disk_query("used", bk_biz_id, mountpoint, &ips),
            disk_query("total", bk_biz_id, mountpoint, &ips)
        );
        self.last_hour(&promql).await
    }

    async fn last_hour(&self, promql: &str) -> PromData {
        let end = now_secs();
        self.query_range(promql, end - CLUSTER_RANGE_SECS, end, CLUSTER_RANGE_STEP)
            .await
            .data
    }
}
