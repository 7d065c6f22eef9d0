//! Span export of `invgw call`
//!
//! One job yields one short trace (dispatch → handler → inventory RPC). The
//! spans are exported over OTLP when the binary is built with the
//! `opentelemetry` feature and flushed before the process exits.

use serde::{Deserialize, Serialize};

fn default_service_name() -> String {
    "invgw".to_string()
}

fn default_endpoint() -> String {
    "http://127.0.0.1:4317".to_string()
}

fn default_sample_ratio() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    #[serde(default)]
    pub enable: bool,

    /// `service.name` of exported spans
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// OTLP gRPC collector
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// 采样比例，0.0 ~ 1.0；按 trace id 采样
    #[serde(default = "default_sample_ratio")]
    pub sample_ratio: f64,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enable: false,
            service_name: default_service_name(),
            endpoint: default_endpoint(),
            sample_ratio: default_sample_ratio(),
        }
    }
}

impl TracingConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.enable {
            return Ok(());
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(format!(
                "tracing endpoint must start with http:// or https://, got '{}'",
                self.endpoint
            ));
        }
        if self.service_name.trim().is_empty() {
            return Err("tracing service_name cannot be empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.sample_ratio) {
            return Err(format!(
                "tracing sample_ratio must be within 0.0..=1.0, got {}",
                self.sample_ratio
            ));
        }
        Ok(())
    }

    /// Collector to export to, `None` when export is off.
    pub fn export_endpoint(&self) -> Option<&str> {
        self.enable.then_some(self.endpoint.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_off_by_default() {
        let config = TracingConfig::default();
        assert_eq!(config.export_endpoint(), None);
        assert_eq!(config.sample_ratio, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_only_applies_when_enabled() {
        let mut config = TracingConfig {
            endpoint: "tempo:4317".to_string(),
            sample_ratio: 2.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.enable = true;
        let err = config.validate().unwrap_err();
        assert!(err.contains("tempo:4317"));

        config.endpoint = "https://tempo:4317".to_string();
        assert!(config.validate().unwrap_err().contains("sample_ratio"));

        config.sample_ratio = 0.25;
        assert!(config.validate().is_ok());
        assert_eq!(config.export_endpoint(), Some("https://tempo:4317"));
    }

    #[test]
    fn test_partial_table_uses_defaults() {
        let config: TracingConfig = toml::from_str(
            r#"
            enable = true
            endpoint = "http://otel-collector:4317"
        "#,
        )
        .unwrap();
        assert_eq!(config.service_name, "invgw");
        assert_eq!(config.export_endpoint(), Some("http://otel-collector:4317"));
    }
}
