//! Pending Request - 可共享的请求 promise
//!
//! 请求在后台 task 中立即执行；任意多个调用方可以等待同一个结算结果

use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::application::error::RequestError;
use crate::application::response::ResponseValue;

pub type RequestResult = Result<ResponseValue, RequestError>;

/// 在途或已结算的请求
#[derive(Clone)]
pub struct PendingRequest {
    inner: Shared<BoxFuture<'static, RequestResult>>,
}

impl PendingRequest {
    /// 在 tokio 上启动请求，返回其 promise
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = RequestResult> + Send + 'static,
    {
        let handle = tokio::spawn(future);
        let inner = async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => Err(RequestError::internal(format!("request task failed: {}", e))),
            }
        }
        .boxed()
        .shared();
        Self { inner }
    }

    /// 已结算的 promise
    pub fn ready(result: RequestResult) -> Self {
        Self {
            inner: futures_util::future::ready(result).boxed().shared(),
        }
    }

    /// 是否为同一个 promise
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.inner.ptr_eq(&other.inner)
    }

    /// 已结算时返回结果
    pub fn peek(&self) -> Option<&RequestResult> {
        self.inner.peek()
    }

    pub fn is_settled(&self) -> bool {
        self.peek().is_some()
    }
}

impl Future for PendingRequest {
    type Output = RequestResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl std::fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRequest")
            .field("settled", &self.is_settled())
            .finish()
    }
}
