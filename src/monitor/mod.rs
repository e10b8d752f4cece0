//! Metric queries for clusters, nodes, pods and containers.
//!
//! Every operation renders a fixed PromQL template, sends it through
//! [`BkMonitor::query`] or [`BkMonitor::query_range`] and shapes the answer
//! for the calling endpoint. Identifiers are interpolated without escaping.
//!
//! [`BkMonitor::query`]: crate::client::BkMonitor::query
//! [`BkMonitor::query_range`]: crate::client::BkMonitor::query_range

pub mod cluster;
pub mod container;
pub mod legacy;
pub mod node;
pub mod pod;

pub use legacy::{get_targets, UnsupportedScheduler};

/// Cluster range charts always cover the last hour.
pub const CLUSTER_RANGE_SECS: i64 = 3600;
pub const CLUSTER_RANGE_STEP: i64 = 60;
