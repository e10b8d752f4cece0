use std::env;
use std::time::Duration;

use crate::error::{AdapterError, Result};

pub const DEFAULT_QUERY_HOST: &str = "http://127.0.0.1:10205";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_PORT: u16 = 8080;

/// Filesystems counted by the disk queries.
pub const DISK_FSTYPE: &str = "ext[234]|btrfs|xfs|zfs";
/// Mount points counted by the disk queries.
pub const DISK_MOUNTPOINT: &str = "/data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub query_host: String,
    pub timeout: Duration,
    pub disk_fstype: String,
    pub disk_mountpoint: String,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            query_host: DEFAULT_QUERY_HOST.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            disk_fstype: DISK_FSTYPE.to_string(),
            disk_mountpoint: DISK_MOUNTPOINT.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let query_host = lookup("BK_MONITOR_QUERY_HOST")
            .unwrap_or(defaults.query_host)
            .trim_end_matches('/')
            .to_string();

        let timeout = match lookup("BK_MONITOR_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse().map_err(|_| {
                AdapterError::Config(format!("BK_MONITOR_TIMEOUT_SECS is not a number: {}", raw))
            })?),
            None => defaults.timeout,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| AdapterError::Config(format!("PORT is not a valid port: {}", raw)))?,
            None => defaults.port,
        };

        Ok(Self {
            query_host,
            timeout,
            disk_fstype: lookup("DISK_FSTYPE").unwrap_or(defaults.disk_fstype),
            disk_mountpoint: lookup("DISK_MOUNTPOINT").unwrap_or(defaults.disk_mountpoint),
            port,
        })
    }

    pub fn query_url(&self) -> String {
        format!("{}/query/ts/promql", self.query_host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.timeout, Duration::from_secs(120));
        assert_eq!(settings.disk_mountpoint, "/data");
    }

    #[test]
    fn test_overrides_and_url() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("BK_MONITOR_QUERY_HOST", "http://monitor.local:10205/"),
            ("BK_MONITOR_TIMEOUT_SECS", "30"),
            ("DISK_MOUNTPOINT", "/data|/var"),
            ("PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(settings.query_url(), "http://monitor.local:10205/query/ts/promql");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.disk_mountpoint, "/data|/var");
        assert_eq!(settings.port, 9000);
    }

    #[test]
    fn test_invalid_numbers() {
        let err = Settings::from_lookup(lookup_from(&[("BK_MONITOR_TIMEOUT_SECS", "soon")]));
        assert!(matches!(err, Err(AdapterError::Config(_))));

        let err = Settings::from_lookup(lookup_from(&[("PORT", "70000")]));
        assert!(matches!(err, Err(AdapterError::Config(_))));
    }
}
