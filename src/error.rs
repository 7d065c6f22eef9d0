//! 统一错误处理模型
//!
//! invgw 命令行程序的顶层错误类型，聚合配置、handler 与依赖 crate 的错误

use thiserror::Error;

/// 主程序的统一错误枚举
#[derive(Debug, Error)]
pub enum Error {
    // ========== 配置相关错误 ==========
    /// 配置文件加载或解析错误
    #[error("Configuration error: {0}")]
    Config(#[from] invgw_common::ConfigError),

    // ========== 业务错误 ==========
    /// Handler 执行失败（包括 inventory 返回的错误）
    #[error("Handler error: {0}")]
    Handler(#[from] handlers::HandlerError),

    /// 命令行参数无法构成合法的 job
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// 配置验证失败
    #[error("Configuration validation failed: {message}")]
    Validation { message: String },

    // ========== 系统级错误 ==========
    /// I/O 操作错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化/反序列化错误
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    // ========== 通用错误 ==========
    /// Anyhow 错误兼容层
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),

    /// 自定义错误消息
    #[error("Application error: {message}")]
    Custom { message: String },
}

/// 统一的 Result 类型
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// 创建自定义错误
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// 创建配置验证失败错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::custom("test error");
        assert!(matches!(err, Error::Custom { .. }));
    }

    #[test]
    fn test_handler_error_conversion() {
        let err: Error = handlers::HandlerError::invalid_argument("no relation set").into();
        assert!(matches!(err, Error::Handler(_)));
        assert!(err.to_string().contains("no relation set"));
    }
}
