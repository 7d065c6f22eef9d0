use super::Timestamps;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TelemetryCollectorKind {
    #[serde(rename = "TELEMETRY_COLLECTOR_KIND_UNSPECIFIED")]
    #[default]
    Unspecified,
    #[serde(rename = "TELEMETRY_COLLECTOR_KIND_HOST")]
    Host,
    #[serde(rename = "TELEMETRY_COLLECTOR_KIND_CLUSTER")]
    Cluster,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityLevel {
    #[serde(rename = "SEVERITY_LEVEL_UNSPECIFIED")]
    #[default]
    Unspecified,
    #[serde(rename = "SEVERITY_LEVEL_CRITICAL")]
    Critical,
    #[serde(rename = "SEVERITY_LEVEL_ERROR")]
    Error,
    #[serde(rename = "SEVERITY_LEVEL_WARN")]
    Warn,
    #[serde(rename = "SEVERITY_LEVEL_INFO")]
    Info,
    #[serde(rename = "SEVERITY_LEVEL_DEBUG")]
    Debug,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TelemetryLogsGroup {
    /// Read-only.
    pub telemetry_logs_group_id: Option<String>,
    pub name: Option<String>,
    pub collector_kind: Option<TelemetryCollectorKind>,
    /// Log sources collected by this group.
    pub groups: Option<Vec<String>>,
    /// Read-only.
    pub timestamps: Option<Timestamps>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TelemetryMetricsGroup {
    /// Read-only.
    pub telemetry_metrics_group_id: Option<String>,
    pub name: Option<String>,
    pub collector_kind: Option<TelemetryCollectorKind>,
    /// Metric plugins collected by this group.
    pub groups: Option<Vec<String>>,
    /// Read-only.
    pub timestamps: Option<Timestamps>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TelemetryLogsProfile {
    /// Read-only.
    pub profile_id: Option<String>,
    pub target_instance: Option<String>,
    pub target_site: Option<String>,
    pub target_region: Option<String>,
    pub log_level: Option<SeverityLevel>,
    pub logs_group_id: Option<String>,
    /// Read-only.
    pub logs_group: Option<TelemetryLogsGroup>,
    /// Read-only.
    pub timestamps: Option<Timestamps>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TelemetryMetricsProfile {
    /// Read-only.
    pub profile_id: Option<String>,
    pub target_instance: Option<String>,
    pub target_site: Option<String>,
    pub target_region: Option<String>,
    /// Collection interval in seconds.
    pub metrics_interval: Option<u32>,
    pub metrics_group_id: Option<String>,
    /// Read-only.
    pub metrics_group: Option<TelemetryMetricsGroup>,
    /// Read-only.
    pub timestamps: Option<Timestamps>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TelemetryGroupListParams {
    pub page_size: Option<i32>,
    pub offset: Option<i32>,
    pub order_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TelemetryProfileListParams {
    pub page_size: Option<i32>,
    pub offset: Option<i32>,
    pub order_by: Option<String>,
    pub instance_id: Option<String>,
    pub site_id: Option<String>,
    pub region_id: Option<String>,
    /// List the profiles effective for the target through its ancestors too
    pub show_inherited: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryLogsGroupList {
    pub telemetry_logs_groups: Vec<TelemetryLogsGroup>,
    pub has_next: bool,
    pub total_elements: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryMetricsGroupList {
    pub telemetry_metrics_groups: Vec<TelemetryMetricsGroup>,
    pub has_next: bool,
    pub total_elements: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryLogsProfileList {
    pub telemetry_logs_profiles: Vec<TelemetryLogsProfile>,
    pub has_next: bool,
    pub total_elements: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryMetricsProfileList {
    pub telemetry_metrics_profiles: Vec<TelemetryMetricsProfile>,
    pub has_next: bool,
    pub total_elements: i32,
}
