//! In-Memory Request Queue Implementation

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{QueueEntry, RequestQueuePort};
use crate::application::RequestDescriptor;

/// 内存在途请求队列
pub struct InMemoryRequestQueue {
    /// request_id -> QueueEntry
    entries: DashMap<String, QueueEntry>,
}

impl InMemoryRequestQueue {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryRequestQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestQueuePort for InMemoryRequestQueue {
    fn set(&self, descriptor: &RequestDescriptor) {
        let previous = self.entries.insert(
            descriptor.request_id.clone(),
            QueueEntry::new(descriptor.clone()),
        );
        if let Some(previous) = previous {
            // 旧请求仍在途，只是不再能通过队列取消
            tracing::debug!(
                request_id = %descriptor.request_id,
                previous_dispatch = %previous.descriptor.dispatch_id,
                "Queue entry replaced"
            );
        }
    }

    fn delete(&self, request_id: &str) -> bool {
        self.entries.remove(request_id).is_some()
    }

    fn release(&self, request_id: &str, dispatch_id: Uuid) -> bool {
        self.entries
            .remove_if(request_id, |_, entry| entry.descriptor.dispatch_id == dispatch_id)
            .is_some()
    }

    async fn cancel(&self, request_id: &str) -> bool {
        let Some((_, entry)) = self.entries.remove(request_id) else {
            return false;
        };

        let fired = entry.descriptor.cancel.cancel();
        tracing::debug!(
            request_id = %request_id,
            dispatch_id = %entry.descriptor.dispatch_id,
            fired = fired,
            "In-flight request cancelled"
        );
        fired
    }

    fn get(&self, request_id: &str) -> Option<QueueEntry> {
        self.entries.get(request_id).map(|e| e.clone())
    }

    fn in_flight(&self) -> Vec<QueueEntry> {
        self.entries.iter().map(|e| e.value().clone()).collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
