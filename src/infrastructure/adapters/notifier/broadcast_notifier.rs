//! Broadcast Notifier - 提示事件广播
//!
//! UI 层订阅后自行展示提示

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::application::ports::{Notification, NotifierPort};

/// 默认通道容量
const DEFAULT_CAPACITY: usize = 100;

/// 广播提示发布器
pub struct BroadcastNotifier {
    channel: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅提示
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.channel.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifierPort for BroadcastNotifier {
    fn notify(&self, notification: Notification) {
        let request_id = notification.request_id.clone();
        if let Err(e) = self.channel.send(notification) {
            tracing::debug!(
                request_id = %request_id,
                error = %e,
                "Failed to publish notification (no receivers)"
            );
        }
    }
}
