use crate::client::{BkMonitor, Transport};
use crate::models::PromData;
use crate::promql::{container_id_alternation, range_step};

/// Label matchers selecting the workload containers of one pod.
fn container_selector(cluster_id: &str, namespace: &str, pod_name: &str, ids: &str) -> String {
    format!(
        r#"cluster_id="{cluster_id}", namespace=~"{namespace}", pod_name=~"{pod_name}", container_name!="", container_name!="POD", BcsNetworkContainer!="true", id=~"{ids}""#
    )
}

fn cpu_usage_query(selector: &str) -> String {
    format!(r#"sum by(container_name) (rate(container_cpu_usage_seconds_total{{{selector}}}[2m])) * 100"#)
}

fn cpu_limit_query(selector: &str) -> String {
    format!(r#"max by(container_name) (container_spec_cpu_quota{{{selector}}})"#)
}

fn memory_usage_query(selector: &str) -> String {
    format!(r#"sum by(container_name) (container_memory_rss{{{selector}}})"#)
}

fn memory_limit_query(selector: &str) -> String {
    format!(r#"max by(container_name) (container_spec_memory_limit_bytes{{{selector}}}) > 0"#)
}

fn fs_bytes_query(direction: &str, selector: &str) -> String {
    format!(r#"sum by(container_name) (container_fs_{direction}_bytes_total{{{selector}}})"#)
}

#[allow(clippy::too_many_arguments)]
impl<T: Transport> BkMonitor<T> {
    fn selector<S: AsRef<str>>(
        &self,
        cluster_id: &str,
        namespace: &str,
        pod_name: &str,
        container_id_list: &[S],
    ) -> String {
        let ids = container_id_alternation(container_id_list);
        container_selector(cluster_id, namespace, pod_name, &ids)
    }

    async fn container_range(&self, promql: &str, start: i64, end: i64) -> PromData {
        self.query_range(promql, start, end, range_step(start, end))
            .await
            .data
    }

    pub async fn container_cpu_usage_range<S: AsRef<str>>(
        &self,
        cluster_id: &str,
        namespace: &str,
        pod_name: &str,
        container_id_list: &[S],
        start: i64,
        end: i64,
        _bk_biz_id: &str,
    ) -> PromData {
        let selector = self.selector(cluster_id, namespace, pod_name, container_id_list);
        self.container_range(&cpu_usage_query(&selector), start, end)
            .await
    }

    /// CPU quota per container, latest sample only.
    pub async fn container_cpu_limit<S: AsRef<str>>(
        &self,
        cluster_id: &str,
        namespace: &str,
        pod_name: &str,
        container_id_list: &[S],
        _bk_biz_id: &str,
    ) -> PromData {
        let selector = self.selector(cluster_id, namespace, pod_name, container_id_list);
        self.query(&cpu_limit_query(&selector)).await.data
    }

    pub async fn container_memory_usage_range<S: AsRef<str>>(
        &self,
        cluster_id: &str,
        namespace: &str,
        pod_name: &str,
        container_id_list: &[S],
        start: i64,
        end: i64,
        _bk_biz_id: &str,
    ) -> PromData {
        let selector = self.selector(cluster_id, namespace, pod_name, container_id_list);
        self.container_range(&memory_usage_query(&selector), start, end)
            .await
    }

    /// Memory limit per container; unlimited containers are filtered out.
    pub async fn container_memory_limit<S: AsRef<str>>(
        &self,
        cluster_id: &str,
        namespace: &str,
        pod_name: &str,
        container_id_list: &[S],
        _bk_biz_id: &str,
    ) -> PromData {
        let selector = self.selector(cluster_id, namespace, pod_name, container_id_list);
        self.query(&memory_limit_query(&selector)).await.data
    }

    pub async fn container_disk_read<S: AsRef<str>>(
        &self,
        cluster_id: &str,
        namespace: &str,
        pod_name: &str,
        container_id_list: &[S],
        start: i64,
        end: i64,
        _bk_biz_id: &str,
    ) -> PromData {
        let selector = self.selector(cluster_id, namespace, pod_name, container_id_list);
        self.container_range(&fs_bytes_query("reads", &selector), start, end)
            .await
    }

    pub async fn container_disk_write<S: AsRef<str>>(
        &self,
        cluster_id: &str,
        namespace: &str,
        pod_name: &str,
        container_id_list: &[S],
        start: i64,
        end: i64,
        _bk_biz_id: &str,
    ) -> PromData {
        let selector = self.selector(cluster_id, namespace, pod_name, container_id_list);
        self.container_range(&fs_bytes_query("writes", &selector), start, end)
            .await
    }
}
