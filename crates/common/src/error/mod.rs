//! 错误处理模块
//!
//! 配置相关的错误类型定义

mod config_error;

// 导出公共 API
pub use config_error::ConfigError;

/// 统一的 Result 类型
pub type Result<T> = std::result::Result<T, ConfigError>;
