pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod monitor;
pub mod normalize;
pub mod promql;

pub use client::{BkMonitor, HttpTransport, Transport};
pub use config::Settings;
pub use error::{AdapterError, Result};
pub use normalize::{bkmonitor_resp2prom, get_first_value};
