//! Logging, tracing export and metrics settings.
//!
//! # Environment Variables
//!
//! - `LOG_DIR`: directory for rolling JSON log files (default: `storage/logs`)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP collector; span export is off when unset
//! - `OTEL_SERVICE_NAME`: service name reported to the collector (default: `rollcall`)
//! - `OBSERVABILITY_ENABLED`: `false` disables the Prometheus recorder (default: `true`)

use crate::env_or;

pub const DEFAULT_LOG_DIR: &str = "storage/logs";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservabilityConfig {
    pub log_dir: String,
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_dir: DEFAULT_LOG_DIR.to_string(),
            otlp_endpoint: None,
            service_name: "rollcall".to_string(),
            metrics_enabled: true,
        }
    }
}

impl ObservabilityConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        Self {
            log_dir: non_empty("LOG_DIR").unwrap_or(defaults.log_dir),
            otlp_endpoint: non_empty("OTEL_EXPORTER_OTLP_ENDPOINT"),
            service_name: non_empty("OTEL_SERVICE_NAME").unwrap_or(defaults.service_name),
            metrics_enabled: env_or("OBSERVABILITY_ENABLED", defaults.metrics_enabled),
        }
    }
}
