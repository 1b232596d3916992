//! Config Resolver - 合并默认配置、调用配置和取消上下文
//!
//! 每次调用产生一个新的、不可变的请求描述符。
//! request id 基于不带查询串的地址和参数计算，之后才把查询类方法的参数编码进 URL

use serde_json::{Map, Value};
use std::time::Duration;
use uuid::Uuid;

use crate::application::cancel::CancelContext;
use crate::application::ports::TransportRequest;
use crate::domain::{
    append_query, encode_query, fingerprint, Method, PayloadMode, RequestFlags, RequestOptions,
};

/// 请求描述符，去重和取消的基本单位
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// 去重/取消使用的 key
    pub request_id: String,
    /// 每次 dispatch 唯一
    pub dispatch_id: Uuid,
    pub method: Method,
    pub url: String,
    pub data: Map<String, Value>,
    pub flags: RequestFlags,
    pub timeout: Option<Duration>,
    pub cancel: CancelContext,
}

impl RequestDescriptor {
    /// 构造 transport 请求；无请求体的方法不带 body
    pub fn to_transport_request(&self) -> TransportRequest {
        let body = match self.method.payload_mode() {
            PayloadMode::Query => None,
            PayloadMode::Body => Some(Value::Object(self.data.clone())),
        };
        TransportRequest {
            request_id: self.request_id.clone(),
            method: self.method,
            url: self.url.clone(),
            body,
            timeout: self.timeout,
        }
    }
}

/// 配置解析器
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    defaults: RequestFlags,
}

impl ConfigResolver {
    pub fn new(defaults: RequestFlags) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> RequestFlags {
        self.defaults
    }

    /// 解析出请求描述符，不修改 `options`
    ///
    /// `url` 已完成路径变量替换；GET/HEAD/OPTIONS 的参数移入查询串，`data` 置空
    pub fn resolve(
        &self,
        method: Method,
        url: &str,
        data: Map<String, Value>,
        options: &RequestOptions,
    ) -> RequestDescriptor {
        let request_id = options
            .request_id
            .clone()
            .unwrap_or_else(|| fingerprint(method, url, &data));

        let (url, data) = match method.payload_mode() {
            PayloadMode::Query => {
                let query = encode_query(&Value::Object(data), "");
                (append_query(url, &query), Map::new())
            }
            PayloadMode::Body => (url.to_string(), data),
        };

        RequestDescriptor {
            request_id,
            dispatch_id: Uuid::new_v4(),
            method,
            url,
            data,
            flags: options.overlay(self.defaults),
            timeout: options.timeout,
            cancel: CancelContext::new(),
        }
    }
}
