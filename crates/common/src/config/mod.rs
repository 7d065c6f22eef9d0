//! 统一配置管理系统
//!
//! 本模块是 invgw 配置的"单一真理之源"。
//! 所有配置项的定义、文档、默认值都在这里统一管理。

pub mod inventory;
pub mod tracing;

pub use crate::config::inventory::InventoryConfig;
pub use crate::config::tracing::TracingConfig;

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// invgw 的主配置结构体
///
/// 配置文件使用 TOML 格式，支持完整的类型安全加载。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    /// 实例名称
    ///
    /// 用于在日志和追踪中区分不同的部署实例，例如 invgw-01, invgw-prod-east-1。
    pub name: String,

    /// 运行环境标识
    ///
    /// - "dev": 开发环境，允许明文 gRPC
    /// - "prod": 生产环境，明文 gRPC 会产生警告
    /// - "test": 测试环境，用于自动化测试
    #[serde(default = "default_env")]
    pub env: String,

    /// Inventory 服务连接配置
    #[serde(default)]
    pub inventory: InventoryConfig,

    /// 可观测性配置（日志 + 追踪）
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// 可观测性配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ObservabilityConfig {
    /// 过滤级别（用于日志与追踪）
    ///
    /// 支持 EnvFilter 语法（如 "info,h2=warn"）。默认值 "info"。
    /// 设置了 RUST_LOG 环境变量时以环境变量为准。
    #[serde(default = "default_filter_level")]
    pub filter_level: String,

    #[serde(default)]
    pub log: LogConfig,

    /// OpenTelemetry 追踪配置（需要编译时启用 `opentelemetry` feature）
    #[serde(default)]
    pub tracing: TracingConfig,
}

/// 日志配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogConfig {
    /// 日志输出目标
    ///
    /// - "console": 仅输出到控制台（默认）
    /// - "file": 输出到文件
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 日志轮转开关（output = "file" 时有效，按天轮转）
    #[serde(default)]
    pub rotate: bool,

    /// 日志文件目录（output = "file" 时有效）
    #[serde(default = "default_log_path")]
    pub path: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter_level: default_filter_level(),
            log: LogConfig::default(),
            tracing: TracingConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            output: default_log_output(),
            rotate: false,
            path: default_log_path(),
        }
    }
}

fn default_env() -> String {
    "dev".to_string()
}

fn default_log_output() -> String {
    "console".to_string()
}

fn default_log_path() -> String {
    "logs/".to_string()
}

fn default_filter_level() -> String {
    "info".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            name: "invgw-default".to_string(),
            env: default_env(),
            inventory: InventoryConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(ConfigError::FileNotFound {
                path: path_ref.display().to_string(),
            });
        }

        if !path_ref.is_file() {
            return Err(ConfigError::NotAFile {
                path: path_ref.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path_ref)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 获取 inventory 配置
    pub fn inventory_config(&self) -> &InventoryConfig {
        &self.inventory
    }

    /// 获取可观测性配置
    pub fn observability_config(&self) -> &ObservabilityConfig {
        &self.observability
    }

    /// 获取追踪配置
    pub fn tracing_config(&self) -> &TracingConfig {
        &self.observability.tracing
    }

    /// 是否输出到控制台
    pub fn is_console_logging(&self) -> bool {
        self.observability.log.output == "console"
    }

    /// 验证配置的有效性
    ///
    /// 返回的列表中以 "Warning:" 开头的条目不会阻止启动。
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Instance name cannot be empty".to_string());
        }

        if !["dev", "prod", "test"].contains(&self.env.as_str()) {
            errors.push(format!(
                "Invalid environment '{}', must be one of: dev, prod, test",
                self.env
            ));
        }

        // 验证过滤级别（EnvFilter 语法，只检查第一个指令）
        {
            let main_level = self
                .observability
                .filter_level
                .split(',')
                .next()
                .unwrap_or("")
                .trim();
            if !["trace", "debug", "info", "warn", "error"].contains(&main_level) {
                errors.push(format!(
                    "Invalid filter level '{}', must start with one of: trace, debug, info, warn, error",
                    self.observability.filter_level
                ));
            }
        }

        if !["console", "file"].contains(&self.observability.log.output.as_str()) {
            errors.push(format!(
                "Invalid log output '{}' (observability.log.output), must be 'console' or 'file'",
                self.observability.log.output
            ));
        }

        if self.observability.log.output == "file" && self.observability.log.path.trim().is_empty()
        {
            errors.push("observability.log.path cannot be empty when output = 'file'".to_string());
        }

        if let Err(e) = self.observability.tracing.validate() {
            errors.push(format!("Tracing configuration error: {e}"));
        }

        if let Err(e) = self.inventory.validate() {
            errors.push(format!("Inventory configuration error: {e}"));
        }

        if self.env == "prod" && self.inventory.is_plaintext() {
            errors.push(
                "Warning: Production environment should enable TLS for the inventory connection (inventory.enable_tls = true)"
                    .to_string(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// 验证配置，只在存在非警告错误时失败
    pub fn validate_strict(&self) -> Result<Vec<String>> {
        match self.validate() {
            Ok(()) => Ok(Vec::new()),
            Err(entries) => {
                let (warnings, errors): (Vec<String>, Vec<String>) = entries
                    .into_iter()
                    .partition(|e| e.starts_with("Warning:"));
                if errors.is_empty() {
                    Ok(warnings)
                } else {
                    Err(ConfigError::Validation(errors))
                }
            }
        }
    }
}
