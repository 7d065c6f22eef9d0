//! invgw 通用基础设施库
//!
//! 为 invgw 各 crate 提供共享的配置模型与配置错误类型

pub mod config;
pub mod error;

// Re-export commonly used types for convenience
pub use config::{GatewayConfig, InventoryConfig, LogConfig, ObservabilityConfig, TracingConfig};
pub use error::{ConfigError, Result};
