//! Reqwest Transport - 通过 reqwest 发起真实 HTTP 调用
//!
//! 实现 TransportPort trait：
//! - 相对地址拼接 `base_url`
//! - 调用与取消上下文竞速，取消时返回 `TransportError::Cancelled`
//! - 非 2xx 响应返回 `TransportError::Status`

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::application::ports::{
    ResponseBody, TransportError, TransportPort, TransportRequest, TransportResponse,
};
use crate::application::CancelContext;
use crate::domain::Method;

/// HTTP transport 配置
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// 相对地址的前缀，空字符串表示不拼接
    pub base_url: String,
    /// 默认超时时间（毫秒）
    pub timeout_ms: u64,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: 5000,
        }
    }
}

impl HttpTransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }
}

/// reqwest transport
pub struct ReqwestTransport {
    client: Client,
    config: HttpTransportConfig,
}

impl ReqwestTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json, text/plain, */*"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 使用默认配置创建
    pub fn with_default_config() -> Result<Self, TransportError> {
        Self::new(HttpTransportConfig::default())
    }

    /// 相对地址拼接 base_url，绝对地址原样返回
    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") || self.config.base_url.is_empty() {
            return url.to_string();
        }
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = self.resolve_url(&request.url);
        let timeout_ms = request
            .timeout
            .map(|t| t.as_millis() as u64)
            .unwrap_or(self.config.timeout_ms);

        let mut builder = self.client.request(to_reqwest_method(request.method), &url);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(
            request_id = %request.request_id,
            method = %request.method,
            url = %url,
            "Sending HTTP request"
        );

        let response = builder.send().await.map_err(|e| map_error(e, timeout_ms))?;
        let response = read_response(response, timeout_ms).await?;

        tracing::debug!(
            request_id = %request.request_id,
            status = response.status,
            "HTTP response received"
        );

        if !response.is_success() {
            return Err(TransportError::Status { response });
        }
        Ok(response)
    }
}

#[async_trait]
impl TransportPort for ReqwestTransport {
    async fn send(
        &self,
        request: TransportRequest,
        cancel: CancelContext,
    ) -> Result<TransportResponse, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            result = self.execute(request) => result,
        }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn map_error(e: reqwest::Error, timeout_ms: u64) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(timeout_ms)
    } else if e.is_connect() {
        TransportError::Network(format!("Cannot connect: {}", e))
    } else if e.is_body() || e.is_decode() {
        TransportError::Aborted
    } else {
        TransportError::Network(e.to_string())
    }
}

async fn read_response(response: Response, timeout_ms: u64) -> Result<TransportResponse, TransportError> {
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let headers: BTreeMap<String, String> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let text = response.text().await.map_err(|e| map_error(e, timeout_ms))?;

    Ok(TransportResponse {
        status,
        headers,
        body: ResponseBody::from_text(text),
        url,
    })
}
