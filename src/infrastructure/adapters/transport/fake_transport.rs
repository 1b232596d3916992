//! Fake Transport - 用于测试的 transport
//!
//! 按 URL 返回预设的响应，不发起网络调用；记录调用次数和被取消的次数

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{
    TransportError, TransportPort, TransportRequest, TransportResponse,
};
use crate::application::CancelContext;

/// 预设的返回
#[derive(Debug, Clone)]
pub enum FakeReply {
    Respond(TransportResponse),
    Fail(TransportError),
}

/// 单个 URL 的预设
#[derive(Debug, Clone)]
pub struct FakeRoute {
    pub reply: FakeReply,
    /// 模拟网络延迟
    pub delay: Duration,
}

/// Fake Transport
pub struct FakeTransport {
    /// url -> route
    routes: DashMap<String, FakeRoute>,
    requests: Mutex<Vec<TransportRequest>>,
    call_count: AtomicUsize,
    cancelled_count: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            routes: DashMap::new(),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
            cancelled_count: AtomicUsize::new(0),
        }
    }

    pub fn route(&self, url: impl Into<String>, route: FakeRoute) {
        self.routes.insert(url.into(), route);
    }

    /// 预设 JSON 响应；非 2xx 状态会以 `TransportError::Status` 返回
    pub fn respond_json(&self, url: impl Into<String>, status: u16, body: Value) {
        self.respond_json_after(url, status, body, Duration::ZERO);
    }

    pub fn respond_json_after(&self, url: impl Into<String>, status: u16, body: Value, delay: Duration) {
        self.route(
            url,
            FakeRoute {
                reply: FakeReply::Respond(TransportResponse::json(status, body)),
                delay,
            },
        );
    }

    pub fn respond_text(&self, url: impl Into<String>, text: impl Into<String>) {
        self.route(
            url,
            FakeRoute {
                reply: FakeReply::Respond(TransportResponse::text(200, text)),
                delay: Duration::ZERO,
            },
        );
    }

    pub fn fail(&self, url: impl Into<String>, error: TransportError) {
        self.route(
            url,
            FakeRoute {
                reply: FakeReply::Fail(error),
                delay: Duration::ZERO,
            },
        );
    }

    /// 总调用次数
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// 因取消而提前返回的次数
    pub fn cancelled_count(&self) -> usize {
        self.cancelled_count.load(Ordering::SeqCst)
    }

    /// 收到的请求（按调用顺序）
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| r.url == url).count()
    }
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransportPort for FakeTransport {
    async fn send(
        &self,
        request: TransportRequest,
        cancel: CancelContext,
    ) -> Result<TransportResponse, TransportError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let Some(route) = self.routes.get(&request.url).map(|r| r.clone()) else {
            tracing::debug!(url = %request.url, "FakeTransport: no route");
            return Err(TransportError::Network(format!("no route for {}", request.url)));
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.cancelled_count.fetch_add(1, Ordering::SeqCst);
                return Err(TransportError::Cancelled);
            }
            _ = tokio::time::sleep(route.delay) => {}
        }

        match route.reply {
            FakeReply::Respond(mut response) => {
                response.url = request.url;
                if response.is_success() {
                    Ok(response)
                } else {
                    Err(TransportError::Status { response })
                }
            }
            FakeReply::Fail(error) => Err(error),
        }
    }
}
