//! Notifier Port - 面向用户的错误提示

use serde::{Deserialize, Serialize};

/// 一条用户提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub request_id: String,
    pub message: String,
}

impl Notification {
    pub fn new(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            message: message.into(),
        }
    }
}

/// Notifier Port
///
/// 提示是副作用，不影响请求结果
pub trait NotifierPort: Send + Sync {
    fn notify(&self, notification: Notification);
}
