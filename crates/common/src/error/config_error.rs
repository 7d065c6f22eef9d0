//! 配置相关错误类型
//!
//! 定义所有与配置解析、验证、加载相关的错误

use thiserror::Error;

/// 配置相关错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Path is not a valid file: {path}")]
    NotAFile { path: String },

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Configuration validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}
