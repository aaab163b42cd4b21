//! Runtime configuration.
//!
//! Values come from the environment (after `.env` is loaded by the binary)
//! and may be overridden by a JSON file:
//! ```json
//! {
//!   "api_url": "https://taxi-analytics.example.com",
//!   "page_size": 50,
//!   "chart_page_size": 1000,
//!   "timeout_secs": 30
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::coordinator::pagination::MAX_PAGE_SIZE;
use crate::error::DashboardError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Backend base URL without a trailing slash.
    pub api_url: String,
    /// Rows per trip-table page.
    pub page_size: u32,
    /// Rows requested for the chart; the whole range should fit in one page.
    pub chart_page_size: u32,
    pub timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: 50,
            chart_page_size: 1000,
            timeout_secs: 30,
        }
    }
}

impl DashboardConfig {
    /// Reads `TAXI_API_URL`, `DASHBOARD_PAGE_SIZE`, `DASHBOARD_CHART_PAGE_SIZE`
    /// and `TAXI_API_TIMEOUT_SECS`, falling back to defaults for unset keys.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("TAXI_API_URL") {
            config.api_url = url;
        }
        if let Some(raw) = lookup("DASHBOARD_PAGE_SIZE") {
            config.page_size = raw
                .trim()
                .parse()
                .with_context(|| format!("DASHBOARD_PAGE_SIZE is not a number: '{raw}'"))?;
        }
        if let Some(raw) = lookup("DASHBOARD_CHART_PAGE_SIZE") {
            config.chart_page_size = raw
                .trim()
                .parse()
                .with_context(|| format!("DASHBOARD_CHART_PAGE_SIZE is not a number: '{raw}'"))?;
        }
        if let Some(raw) = lookup("TAXI_API_TIMEOUT_SECS") {
            config.timeout_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("TAXI_API_TIMEOUT_SECS is not a number: '{raw}'"))?;
        }

        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON config file. Keys missing from the file keep their defaults.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{path}'"))?;
        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("invalid config file '{path}'"))?;

        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        for size in [self.page_size, self.chart_page_size] {
            if size == 0 || size > MAX_PAGE_SIZE {
                return Err(DashboardError::InvalidPageSize {
                    got: size,
                    max: MAX_PAGE_SIZE,
                });
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn normalize(&mut self) {
        while self.api_url.ends_with('/') {
            self.api_url.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env;
    use std::fs;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = DashboardConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("TAXI_API_URL", "https://api.example.com/"),
            ("DASHBOARD_PAGE_SIZE", "25"),
            ("TAXI_API_TIMEOUT_SECS", " 90 "),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.chart_page_size, 1000);
        assert_eq!(config.timeout(), Duration::from_secs(90));
    }

    #[test]
    fn test_rejects_bad_numbers_and_sizes() {
        let load = |key: &str, value: &str| {
            DashboardConfig::from_lookup(lookup_from(&[(key, value)]))
        };

        assert!(load("DASHBOARD_PAGE_SIZE", "lots").is_err());
        assert!(load("DASHBOARD_PAGE_SIZE", "0").is_err());
        assert!(load("DASHBOARD_CHART_PAGE_SIZE", "5000").is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let path = format!("{}/trip_dashboard_test_config.json", env::temp_dir().display());
        fs::write(&path, r#"{"api_url": "http://10.0.0.5:8000", "page_size": 100}"#).unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.api_url, "http://10.0.0.5:8000");
        assert_eq!(config.page_size, 100);
        assert_eq!(config.chart_page_size, 1000);

        fs::remove_file(&path).unwrap();
    }
}
