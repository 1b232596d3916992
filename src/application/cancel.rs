//! Cancel Context - 取消上下文
//!
//! 每个请求描述符持有一个，传给 transport 并由其检查/传播

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// 单次使用的取消句柄
///
/// clone 共享同一状态；只有第一次 `cancel()` 生效
#[derive(Debug, Clone, Default)]
pub struct CancelContext {
    token: CancellationToken,
    fired: Arc<AtomicBool>,
}

impl CancelContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 触发取消，返回本次调用是否真正触发
    pub fn cancel(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.token.cancel();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// 等待取消发生
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}
