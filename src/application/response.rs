//! 请求成功时返回给调用方的值

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::application::error::RequestError;
use crate::application::ports::{ResponseBody, TransportResponse};

/// 归一化后的成功结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseValue {
    /// 服务端直接返回的纯文本（如 markdown 文档）
    Text(String),
    /// 响应体
    Data(Value),
    /// 完整响应（`original_response`）
    Original(TransportResponse),
}

impl ResponseValue {
    pub fn as_data(&self) -> Option<&Value> {
        match self {
            ResponseValue::Data(value) => Some(value),
            ResponseValue::Original(response) => response.body.as_json(),
            ResponseValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// 转为 JSON 值，文本变为 JSON 字符串
    pub fn into_data(self) -> Value {
        match self {
            ResponseValue::Text(text) => Value::String(text),
            ResponseValue::Data(value) => value,
            ResponseValue::Original(response) => match response.body {
                ResponseBody::Json(value) => value,
                ResponseBody::Text(text) => Value::String(text),
                ResponseBody::Empty => Value::Null,
            },
        }
    }

    /// 反序列化为具体类型
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        serde_json::from_value(self.clone().into_data()).map_err(|e| {
            tracing::warn!(error = %e, "Failed to decode response payload");
            RequestError::Decode(e.to_string())
        })
    }
}
