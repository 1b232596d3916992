//! Response/Error Normalizer - 响应与错误归一化
//!
//! 把 transport 的原始结果映射为统一的成功值或分类错误，并按策略触发用户提示

use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

use crate::application::error::{HttpStatusError, RequestError};
use crate::application::pending::RequestResult;
use crate::application::ports::{
    Notification, NotifierPort, ResponseBody, TransportError, TransportResponse,
};
use crate::application::resolver::RequestDescriptor;
use crate::application::response::ResponseValue;

pub const UNAUTHORIZED_MESSAGE: &str = "authentication error";
pub const SYSTEM_ERROR_MESSAGE: &str = "system exception";
pub const FORBIDDEN_MESSAGE: &str = "forbidden";
pub const NETWORK_ERROR_MESSAGE: &str = "network error";

/// 附加到提示文本的 correlation id 长度
const CORRELATION_ID_PREFIX_LEN: usize = 8;

/// 响应归一化器
pub struct ResponseNormalizer {
    notifier: Arc<dyn NotifierPort>,
    /// 不自动提示的业务码
    suppressed_codes: HashSet<i64>,
}

impl ResponseNormalizer {
    pub fn new(notifier: Arc<dyn NotifierPort>, suppressed_codes: impl IntoIterator<Item = i64>) -> Self {
        Self {
            notifier,
            suppressed_codes: suppressed_codes.into_iter().collect(),
        }
    }

    /// 处理 transport 成功返回的响应
    ///
    /// - 纯文本响应直接返回
    /// - `global_error` 开启且业务码非 0 时按失败处理
    /// - `original_response` 决定返回完整响应还是响应体
    pub fn resolve(&self, descriptor: &RequestDescriptor, response: TransportResponse) -> RequestResult {
        if let ResponseBody::Text(text) = &response.body {
            return Ok(ResponseValue::Text(text.clone()));
        }

        if descriptor.flags.global_error {
            if response.body.as_json().is_some_and(has_failure_code) {
                return Err(self.reject_response(descriptor, response, None));
            }
        }

        if descriptor.flags.original_response {
            return Ok(ResponseValue::Original(response));
        }

        Ok(match response.body {
            ResponseBody::Json(value) => ResponseValue::Data(value),
            ResponseBody::Text(text) => ResponseValue::Text(text),
            ResponseBody::Empty => ResponseValue::Data(Value::Null),
        })
    }

    /// 分类 transport 错误，必要时提示用户
    pub fn reject(&self, descriptor: &RequestDescriptor, error: TransportError) -> RequestError {
        let request_id = descriptor.request_id.clone();
        let message = error.to_string();

        match error {
            TransportError::Cancelled => RequestError::Cancelled { request_id },
            TransportError::Aborted => RequestError::Aborted { request_id },
            TransportError::Status { response } => {
                self.reject_response(descriptor, response, Some(message))
            }
            TransportError::Network(detail) => {
                tracing::debug!(request_id = %request_id, detail = %detail, "Network error");
                // 网络层错误总是提示，不受开关和屏蔽列表影响
                self.notify(&request_id, NETWORK_ERROR_MESSAGE);
                RequestError::Transport {
                    request_id,
                    message: NETWORK_ERROR_MESSAGE.to_string(),
                }
            }
            TransportError::Timeout(_) => {
                if descriptor.flags.global_error {
                    self.notify(&request_id, &message);
                }
                RequestError::Transport {
                    request_id,
                    message,
                }
            }
        }
    }

    /// 收到响应但判定为失败
    fn reject_response(
        &self,
        descriptor: &RequestDescriptor,
        response: TransportResponse,
        transport_message: Option<String>,
    ) -> RequestError {
        let data = response.body.as_json();
        let code = data.and_then(application_code);

        let mut message = transport_message
            .or_else(|| string_field(data, "message"))
            .unwrap_or_default();
        match response.status {
            401 => message = UNAUTHORIZED_MESSAGE.to_string(),
            500 => message = SYSTEM_ERROR_MESSAGE.to_string(),
            403 => message = FORBIDDEN_MESSAGE.to_string(),
            _ => {}
        }

        let correlation_id = string_field(data, "request_id");
        if let Some(id) = &correlation_id {
            let prefix: String = id.chars().take(CORRELATION_ID_PREFIX_LEN).collect();
            message = format!("{}( {} )", message, prefix);
        }

        let suppressed = code.is_some_and(|c| self.suppressed_codes.contains(&c));
        if descriptor.flags.global_error && !suppressed && !message.is_empty() {
            self.notify(&descriptor.request_id, &message);
        }

        RequestError::HttpStatus(HttpStatusError {
            request_id: descriptor.request_id.clone(),
            status: response.status,
            code,
            message,
            correlation_id,
            response,
        })
    }

    fn notify(&self, request_id: &str, message: &str) {
        tracing::debug!(request_id = %request_id, message = %message, "Notifying user");
        self.notifier.notify(Notification::new(request_id, message));
    }
}

/// 响应体中的业务码，支持整数或整数字符串；非整数没有对应的码
fn application_code(data: &Value) -> Option<i64> {
    match data.get("code")? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// 业务码存在且不为 0 时判定失败，`0.5` 这类非整数也算失败
fn has_failure_code(data: &Value) -> bool {
    match data.get("code") {
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().is_ok_and(|f| f != 0.0),
        _ => false,
    }
}

fn string_field(data: Option<&Value>, name: &str) -> Option<String> {
    data?.get(name)?.as_str().map(String::from)
}
