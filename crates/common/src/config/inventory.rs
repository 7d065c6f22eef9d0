//! Inventory 客户端配置
//!
//! handlers 通过 gRPC 连接 inventory 服务时使用的配置

use serde::{Deserialize, Serialize};

fn default_endpoint() -> String {
    "http://127.0.0.1:50051".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_client_uuid() -> String {
    "00000000-0000-0000-0000-000000000000".to_string()
}

/// Inventory 客户端配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InventoryConfig {
    /// Inventory 服务地址
    ///
    /// gRPC endpoint，例如: "http://127.0.0.1:50051" 或 "https://inventory.example.com:50051"
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// 客户端标识
    ///
    /// 每个请求都会携带该 UUID，inventory 用它区分调用方
    #[serde(default = "default_client_uuid")]
    pub client_uuid: String,

    /// 请求超时时间（秒）
    ///
    /// 同时用作连接超时。Job 自带 deadline 时以 job 为准，此值只作为缺省 deadline。
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// 是否启用 TLS
    ///
    /// 默认为 false（使用 HTTP）。设为 true 时使用 gRPC over TLS。
    #[serde(default)]
    pub enable_tls: bool,

    /// TLS 域名（启用 TLS 时必需）
    pub tls_domain: Option<String>,

    /// CA 证书路径（用于验证服务端证书）
    pub ca_cert: Option<String>,

    /// 客户端证书路径（mTLS）
    pub client_cert: Option<String>,

    /// 客户端私钥路径（mTLS）
    pub client_key: Option<String>,

    /// 默认租户
    ///
    /// Job 未携带租户时使用
    pub default_tenant: Option<String>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            client_uuid: default_client_uuid(),
            timeout_seconds: default_timeout_seconds(),
            enable_tls: false,
            tls_domain: None,
            ca_cert: None,
            client_cert: None,
            client_key: None,
            default_tenant: None,
        }
    }
}

impl InventoryConfig {
    /// 验证 inventory 客户端配置
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("inventory endpoint cannot be empty".to_string());
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(format!(
                "inventory endpoint must start with http:// or https://, got '{}'",
                self.endpoint
            ));
        }

        if self.client_uuid.trim().is_empty() {
            return Err("inventory client_uuid cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("inventory timeout_seconds must be greater than 0".to_string());
        }

        if self.enable_tls
            && self
                .tls_domain
                .as_deref()
                .map(|d| d.trim().is_empty())
                .unwrap_or(true)
        {
            return Err("tls_domain is required when enable_tls is true".to_string());
        }

        if self.client_cert.is_some() != self.client_key.is_some() {
            return Err("Both client_cert and client_key must be provided for mTLS".to_string());
        }

        Ok(())
    }

    /// 是否使用明文连接
    pub fn is_plaintext(&self) -> bool {
        !self.enable_tls && self.endpoint.starts_with("http://")
    }
}
