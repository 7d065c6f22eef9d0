use super::Timestamps;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceKind {
    #[serde(rename = "INSTANCE_KIND_UNSPECIFIED")]
    #[default]
    Unspecified,
    #[serde(rename = "INSTANCE_KIND_METAL")]
    Metal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceState {
    #[serde(rename = "INSTANCE_STATE_UNSPECIFIED")]
    #[default]
    Unspecified,
    #[serde(rename = "INSTANCE_STATE_RUNNING")]
    Running,
    #[serde(rename = "INSTANCE_STATE_DELETED")]
    Deleted,
    #[serde(rename = "INSTANCE_STATE_UNTRUSTED")]
    Untrusted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityFeature {
    #[serde(rename = "SECURITY_FEATURE_UNSPECIFIED")]
    #[default]
    Unspecified,
    #[serde(rename = "SECURITY_FEATURE_NONE")]
    None,
    #[serde(rename = "SECURITY_FEATURE_SECURE_BOOT_AND_FULL_DISK_ENCRYPTION")]
    SecureBootAndFullDiskEncryption,
}

/// Host summary embedded in an instance, read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HostSummary {
    pub resource_id: String,
    pub name: Option<String>,
    pub site_id: Option<String>,
}

/// Operating system summary embedded in an instance, read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OsSummary {
    pub resource_id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Instance {
    /// Read-only.
    pub resource_id: Option<String>,
    pub name: Option<String>,
    pub kind: Option<InstanceKind>,
    /// Set on creation only.
    #[serde(rename = "hostID")]
    pub host_id: Option<String>,
    #[serde(rename = "osID")]
    pub os_id: Option<String>,
    pub desired_state: Option<InstanceState>,
    /// Read-only.
    pub current_state: Option<InstanceState>,
    pub security_feature: Option<SecurityFeature>,
    /// Read-only.
    pub host: Option<HostSummary>,
    /// Read-only.
    pub os: Option<OsSummary>,
    /// Read-only.
    pub timestamps: Option<Timestamps>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InstanceListParams {
    pub page_size: Option<i32>,
    pub offset: Option<i32>,
    pub order_by: Option<String>,
    pub filter: Option<String>,
    pub host_id: Option<String>,
    pub site_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceList {
    pub instances: Vec<Instance>,
    pub has_next: bool,
    pub total_elements: i32,
}
