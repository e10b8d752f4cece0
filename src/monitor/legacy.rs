//! Placeholders for the Mesos scheduler integration.
//!
//! The monitor backend carries no Mesos data. Every operation answers with a
//! fixed placeholder and performs no query.

use serde_json::{Map, Value};

use crate::models::RemainUsage;

/// Scheduler whose metrics the backend does not provide.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedScheduler;

impl UnsupportedScheduler {
    fn remain_placeholder() -> RemainUsage {
        RemainUsage {
            total: "0".to_string(),
            remain: "0".to_string(),
        }
    }

    pub fn agent_memory_usage(&self, _cluster_id: &str, _ip: &str) -> RemainUsage {
        Self::remain_placeholder()
    }

    pub fn agent_cpu_usage(&self, _cluster_id: &str, _ip: &str) -> RemainUsage {
        Self::remain_placeholder()
    }

    pub fn agent_ip_remain_count(&self, _cluster_id: &str, _ip: &str) -> u64 {
        0
    }

    pub fn cluster_cpu_usage<S: AsRef<str>>(&self, _cluster_id: &str, _node_list: &[S]) -> RemainUsage {
        Self::remain_placeholder()
    }

    pub fn cluster_memory_usage<S: AsRef<str>>(
        &self,
        _cluster_id: &str,
        _node_list: &[S],
    ) -> RemainUsage {
        Self::remain_placeholder()
    }

    /// Remaining cores.
    pub fn cluster_cpu_resource_remain_range(&self, _cluster_id: &str, _start: i64, _end: i64) -> Map<String, Value> {
        Map::new()
    }

    /// Total cores.
    pub fn cluster_cpu_resource_total_range(&self, _cluster_id: &str, _start: i64, _end: i64) -> Map<String, Value> {
        Map::new()
    }

    /// Used cores.
    pub fn cluster_cpu_resource_used_range(&self, _cluster_id: &str, _start: i64, _end: i64) -> Map<String, Value> {
        Map::new()
    }

    /// Remaining memory, MB.
    pub fn cluster_memory_resource_remain_range(&self, _cluster_id: &str, _start: i64, _end: i64) -> Map<String, Value> {
        Map::new()
    }

    /// Total memory, MB.
    pub fn cluster_memory_resource_total_range(&self, _cluster_id: &str, _start: i64, _end: i64) -> Map<String, Value> {
        Map::new()
    }

    /// Used memory, MB.
    pub fn cluster_memory_resource_used_range(&self, _cluster_id: &str, _start: i64, _end: i64) -> Map<String, Value> {
        Map::new()
    }
}

/// Scrape targets of a cluster. The backend exposes none.
pub fn get_targets(_project_id: &str, _cluster_id: &str, _dedup: bool) -> Vec<Value> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_placeholders() {
        let mesos = UnsupportedScheduler;
        for usage in [
            mesos.agent_memory_usage("BCS-MESOS-10000", "10.0.0.1"),
            mesos.agent_cpu_usage("BCS-MESOS-10000", "10.0.0.1"),
            mesos.cluster_cpu_usage("BCS-MESOS-10000", &["10.0.0.1"]),
            mesos.cluster_memory_usage::<&str>("BCS-MESOS-10000", &[]),
        ] {
            assert_eq!(usage.total, "0");
            assert_eq!(usage.remain, "0");
        }
        assert_eq!(mesos.agent_ip_remain_count("BCS-MESOS-10000", "10.0.0.1"), 0);
    }

    #[test]
    fn test_range_placeholders_are_empty() {
        let mesos = UnsupportedScheduler;
        assert!(mesos.cluster_cpu_resource_remain_range("c", 0, 60).is_empty());
        assert!(mesos.cluster_cpu_resource_total_range("c", 0, 60).is_empty());
        assert!(mesos.cluster_cpu_resource_used_range("c", 0, 60).is_empty());
        assert!(mesos.cluster_memory_resource_remain_range("c", 0, 60).is_empty());
        assert!(mesos.cluster_memory_resource_total_range("c", 0, 60).is_empty());
        assert!(mesos.cluster_memory_resource_used_range("c", 0, 60).is_empty());
    }

    #[test]
    fn test_no_targets() {
        assert!(get_targets("project", "BCS-K8S-40000", true).is_empty());
    }
}
