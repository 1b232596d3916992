//! Request Queue Port - 在途请求登记
//!
//! 记录取消在途请求所需的信息，具体实现在 infrastructure/memory 层

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::resolver::RequestDescriptor;

/// 在途请求记录
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub descriptor: RequestDescriptor,
    pub dispatched_at: DateTime<Utc>,
}

impl QueueEntry {
    pub fn new(descriptor: RequestDescriptor) -> Self {
        Self {
            descriptor,
            dispatched_at: Utc::now(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.descriptor.request_id
    }
}

/// Request Queue Port
#[async_trait]
pub trait RequestQueuePort: Send + Sync {
    /// 登记在途请求，同 id 的旧记录被替换
    fn set(&self, descriptor: &RequestDescriptor);

    /// 移除记录但不取消
    fn delete(&self, request_id: &str) -> bool;

    /// 结算时清理：只移除同一次 dispatch 创建的记录
    fn release(&self, request_id: &str, dispatch_id: Uuid) -> bool;

    /// 触发取消并移除记录，没有记录时什么也不做
    ///
    /// 返回是否触发了取消
    async fn cancel(&self, request_id: &str) -> bool;

    fn get(&self, request_id: &str) -> Option<QueueEntry>;

    fn in_flight(&self) -> Vec<QueueEntry>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
