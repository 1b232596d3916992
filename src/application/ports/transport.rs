//! Transport Port - 底层 HTTP 调用抽象
//!
//! 具体实现在 infrastructure/adapters 层（reqwest 或测试用的 fake）

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use crate::application::cancel::CancelContext;
use crate::domain::Method;

/// Transport 错误
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// 通过 CancelContext 主动取消
    #[error("Request cancelled")]
    Cancelled,

    /// 连接被中止
    #[error("Request aborted")]
    Aborted,

    /// 未收到响应的网络层错误
    #[error("Network Error: {0}")]
    Network(String),

    #[error("timeout of {0}ms exceeded")]
    Timeout(u64),

    /// 收到非 2xx 响应
    #[error("Request failed with status code {}", .response.status)]
    Status { response: TransportResponse },
}

/// 响应体
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Empty,
}

impl ResponseBody {
    /// 按 JSON 解析文本，失败则保留原始文本
    pub fn from_text(text: String) -> Self {
        if text.is_empty() {
            return ResponseBody::Empty;
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// 发给 transport 的请求
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// 仅用于日志和追踪
    pub request_id: String,
    pub method: Method,
    /// 已完成路径变量替换；无请求体的方法已拼接查询串
    pub url: String,
    pub body: Option<Value>,
    pub timeout: Option<Duration>,
}

/// transport 返回的完整响应
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: ResponseBody,
    /// 实际请求的地址
    pub url: String,
}

impl TransportResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: ResponseBody::Json(body),
            url: String::new(),
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: ResponseBody::Text(body.into()),
            url: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport Port
///
/// 实现方需要在 `cancel` 触发后尽快返回 `TransportError::Cancelled`
#[async_trait]
pub trait TransportPort: Send + Sync {
    async fn send(
        &self,
        request: TransportRequest,
        cancel: CancelContext,
    ) -> Result<TransportResponse, TransportError>;
}
