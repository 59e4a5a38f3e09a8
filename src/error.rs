//! Satchel 统一错误类型定义
//!
//! 基于 `thiserror`，校验/未找到/外部服务三类携带完整句子消息，直接面向调用方展示。

use std::io;
use thiserror::Error;

/// Satchel 错误类型
#[derive(Debug, Error)]
pub enum SatchelError {
    /// I/O 错误（文件读写、目录操作等）
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON 解析/序列化错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 输入数据校验失败（消息本身是完整句子，直接展示给调用方）
    #[error("{0}")]
    Validation(String),

    /// 资源不存在
    #[error("{0}")]
    NotFound(String),

    /// 外部服务调用失败（AI 接口等）
    #[error("{0}")]
    Service(String),
}

/// Satchel Result 类型别名
pub type Result<T> = std::result::Result<T, SatchelError>;

impl SatchelError {
    /// 创建 Validation 错误
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// 创建 NotFound 错误
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// 创建 Service 错误
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SatchelError::validation("Task title cannot be empty.");
        assert_eq!(err.to_string(), "Task title cannot be empty.");

        let err = SatchelError::not_found("Task with id 'abc' not found.");
        assert_eq!(err.to_string(), "Task with id 'abc' not found.");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: SatchelError = io_err.into();
        assert!(matches!(err, SatchelError::Io(_)));
    }

    #[test]
    fn test_service_error_from_string() {
        let err = SatchelError::service("request timed out");
        assert!(err.to_string().contains("timed out"));
    }
}
