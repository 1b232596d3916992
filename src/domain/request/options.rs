//! Request Context - Options
//!
//! 调用方配置与默认配置的合并（浅合并，调用方优先）

use serde::Deserialize;
use std::time::Duration;

/// 已解析的请求开关
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RequestFlags {
    /// 是否根据状态码/业务码自动提示
    #[serde(default = "default_true")]
    pub global_error: bool,

    /// 存在缓存时直接复用
    #[serde(default)]
    pub from_cache: bool,

    /// 发起前清除缓存
    #[serde(default)]
    pub clear_cache: bool,

    /// 返回完整响应而不是响应体
    #[serde(default)]
    pub original_response: bool,

    /// 路由变更时取消（由路由层消费）
    #[serde(default = "default_true")]
    pub cancel_when_route_change: bool,

    /// 发起前取消同 id 的上一次请求
    #[serde(default)]
    pub cancel_previous: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RequestFlags {
    fn default() -> Self {
        Self {
            global_error: true,
            from_cache: false,
            clear_cache: false,
            original_response: false,
            cancel_when_route_change: true,
            cancel_previous: false,
        }
    }
}

/// 单次调用的配置
///
/// 未设置的字段沿用默认值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub request_id: Option<String>,
    pub global_error: Option<bool>,
    pub from_cache: Option<bool>,
    pub clear_cache: Option<bool>,
    pub original_response: Option<bool>,
    pub cancel_when_route_change: Option<bool>,
    pub cancel_previous: Option<bool>,
    /// 传输层超时，覆盖 transport 的默认值
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn global_error(mut self, enabled: bool) -> Self {
        self.global_error = Some(enabled);
        self
    }

    pub fn from_cache(mut self, enabled: bool) -> Self {
        self.from_cache = Some(enabled);
        self
    }

    pub fn clear_cache(mut self, enabled: bool) -> Self {
        self.clear_cache = Some(enabled);
        self
    }

    pub fn original_response(mut self, enabled: bool) -> Self {
        self.original_response = Some(enabled);
        self
    }

    pub fn cancel_when_route_change(mut self, enabled: bool) -> Self {
        self.cancel_when_route_change = Some(enabled);
        self
    }

    pub fn cancel_previous(mut self, enabled: bool) -> Self {
        self.cancel_previous = Some(enabled);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// 叠加到默认开关上，返回新值
    pub fn overlay(&self, defaults: RequestFlags) -> RequestFlags {
        RequestFlags {
            global_error: self.global_error.unwrap_or(defaults.global_error),
            from_cache: self.from_cache.unwrap_or(defaults.from_cache),
            clear_cache: self.clear_cache.unwrap_or(defaults.clear_cache),
            original_response: self.original_response.unwrap_or(defaults.original_response),
            cancel_when_route_change: self
                .cancel_when_route_change
                .unwrap_or(defaults.cancel_when_route_change),
            cancel_previous: self.cancel_previous.unwrap_or(defaults.cancel_previous),
        }
    }
}
