//! Tracing Notifier - 把用户提示写入日志
//!
//! 没有 UI 层时（命令行、后台服务）使用

use crate::application::ports::{Notification, NotifierPort};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotifierPort for TracingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::error!(
            request_id = %notification.request_id,
            message = %notification.message,
            "Request failed"
        );
    }
}
