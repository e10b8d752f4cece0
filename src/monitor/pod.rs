use crate::client::{BkMonitor, Transport};
use crate::models::PromData;
use crate::promql::{join_alternation, range_step};

fn cpu_usage_query(cluster_id: &str, bk_biz_id: &str, namespace: &str, pods: &str) -> String {
    format!(
        r#"sum by (pod_name) (rate(container_cpu_usage_seconds_total{{cluster_id="{cluster_id}", bk_biz_id="{bk_biz_id}", namespace=~"{namespace}", pod_name=~"{pods}", container_name!="", container_name!="POD"}}[2m])) * 100"#
    )
}

fn memory_usage_query(cluster_id: &str, namespace: &str, pods: &str) -> String {
    format!(
        r#"sum by (pod_name) (container_memory_rss{{cluster_id="{cluster_id}", namespace=~"{namespace}", pod_name=~"{pods}", container_name!="", container_name!="POD"}})"#
    )
}

fn network_query(direction: &str, cluster_id: &str, namespace: &str, pods: &str) -> String {
    format!(
        r#"sum by(pod_name) (rate(container_network_{direction}_bytes_total{{cluster_id="{cluster_id}", namespace=~"{namespace}", pod_name=~"{pods}"}}[2m]))"#
    )
}

impl<T: Transport> BkMonitor<T> {
    /// CPU usage percentage per pod.
    pub async fn pod_cpu_usage_range<S: AsRef<str>>(
        &self,
        cluster_id: &str,
        namespace: &str,
        pod_name_list: &[S],
        start: i64,
        end: i64,
        bk_biz_id: &str,
    ) -> PromData {
        let pods = join_alternation(pod_name_list);
        let promql = cpu_usage_query(cluster_id, bk_biz_id, namespace, &pods);
        self.query_range(&promql, start, end, range_step(start, end))
            .await
            .data
    }

    /// Resident memory per pod, in bytes.
    pub async fn pod_memory_usage_range<S: AsRef<str>>(
        &self,
        cluster_id: &str,
        namespace: &str,
        pod_name_list: &[S],
        start: i64,
        end: i64,
        _bk_biz_id: &str,
    ) -> PromData {
        let pods = join_alternation(pod_name_list);
        let promql = memory_usage_query(cluster_id, namespace, &pods);
        self.query_range(&promql, start, end, range_step(start, end))
            .await
            .data
    }

    pub async fn pod_network_receive<S: AsRef<str>>(
        &self,
        cluster_id: &str,
        namespace: &str,
        pod_name_list: &[S],
        start: i64,
        end: i64,
        _bk_biz_id: &str,
    ) -> PromData {
        let pods = join_alternation(pod_name_list);
        let promql = network_query("receive", cluster_id, namespace, &pods);
        self.query_range(&promql, start, end, range_step(start, end))
            .await
            .data
    }

    pub async fn pod_network_transmit<S: AsRef<str>>(
        &self,
        cluster_id: &str,
        namespace: &str,
        pod_name_list: &[S],
        start: i64,
        end: i64,
        _bk_biz_id: &str,
    ) -> PromData {
        let pods = join_alternation(pod_name_list);
        let promql = network_query("transmit", cluster_id, namespace, &pods);
        self.query_range(&promql, start, end, range_step(start, end))
            .await
            .data
    }
}
