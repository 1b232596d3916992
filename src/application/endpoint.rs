//! Endpoint - 绑定方法和地址的接口
//!
//! 业务模块用它声明接口，例如
//! `client.endpoint(Method::Post, "/api/user/login")`

use serde_json::Value;
use std::sync::Arc;

use crate::application::client::RequestClient;
use crate::application::pending::RequestResult;
use crate::domain::{Method, RequestOptions};

#[derive(Clone)]
pub struct Endpoint {
    client: Arc<RequestClient>,
    method: Method,
    url: String,
    options: RequestOptions,
}

impl Endpoint {
    pub fn new(client: Arc<RequestClient>, method: Method, url: impl Into<String>) -> Self {
        Self {
            client,
            method,
            url: url.into(),
            options: RequestOptions::default(),
        }
    }

    /// 设置该 endpoint 每次调用的默认配置
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn call(&self, params: Value) -> RequestResult {
        self.call_with(params, self.options.clone()).await
    }

    /// 使用单次配置调用，替换 endpoint 的默认配置
    pub async fn call_with(&self, params: Value, options: RequestOptions) -> RequestResult {
        self.client
            .request(self.method, &self.url, params, options)
            .await
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("options", &self.options)
            .finish()
    }
}
