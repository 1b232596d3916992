//! 请求错误定义
//!
//! 一次结算结果会被所有复用缓存 promise 的调用方共享，因此错误需要可 Clone

use thiserror::Error;

use crate::application::ports::TransportResponse;

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 主动取消或连接中止
    Cancelled,
    /// 未收到响应
    Transport,
    /// 收到非 2xx 响应
    HttpStatus,
    /// 2xx 响应但业务码非 0
    ApplicationCode,
    /// 调用方参数或本地处理错误
    Client,
}

/// 收到响应但被判定为失败
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct HttpStatusError {
    pub request_id: String,
    pub status: u16,
    /// 响应体中的业务码
    pub code: Option<i64>,
    /// 面向用户的提示文本
    pub message: String,
    /// 响应体中的 request_id
    pub correlation_id: Option<String>,
    pub response: TransportResponse,
}

impl HttpStatusError {
    /// transport 成功但业务码非 0
    pub fn is_application_code(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 请求错误
#[derive(Debug, Clone, Error)]
pub enum RequestError {
    #[error("Request cancelled: {request_id}")]
    Cancelled { request_id: String },

    #[error("Request aborted: {request_id}")]
    Aborted { request_id: String },

    #[error("{message}")]
    Transport { request_id: String, message: String },

    #[error(transparent)]
    HttpStatus(HttpStatusError),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RequestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RequestError::Cancelled { .. } | RequestError::Aborted { .. } => ErrorKind::Cancelled,
            RequestError::Transport { .. } => ErrorKind::Transport,
            RequestError::HttpStatus(e) if e.is_application_code() => ErrorKind::ApplicationCode,
            RequestError::HttpStatus(_) => ErrorKind::HttpStatus,
            RequestError::InvalidParams(_) | RequestError::Decode(_) | RequestError::Internal(_) => {
                ErrorKind::Client
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind() == ErrorKind::Cancelled
    }

    pub fn request_id(&self) -> Option<&str> {
        match self {
            RequestError::Cancelled { request_id }
            | RequestError::Aborted { request_id }
            | RequestError::Transport { request_id, .. } => Some(request_id),
            RequestError::HttpStatus(e) => Some(&e.request_id),
            _ => None,
        }
    }

    /// 创建参数错误
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
