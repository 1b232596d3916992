//! In-Memory Request Cache Implementation

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{CacheSelector, RequestCachePort};
use crate::application::PendingRequest;

/// 内存请求缓存
///
/// 条目只在显式删除时移除，结算不会自动淘汰
pub struct InMemoryRequestCache {
    /// request_id -> PendingRequest
    entries: DashMap<String, PendingRequest>,
}

impl InMemoryRequestCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryRequestCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestCachePort for InMemoryRequestCache {
    fn get(&self, request_id: &str) -> Option<PendingRequest> {
        self.entries.get(request_id).map(|p| p.clone())
    }

    fn get_all(&self) -> Vec<PendingRequest> {
        self.entries.iter().map(|p| p.value().clone()).collect()
    }

    fn set(&self, request_id: &str, pending: PendingRequest) {
        self.entries.insert(request_id.to_string(), pending);
    }

    async fn delete(&self, selector: CacheSelector) -> CacheSelector {
        let removed = match &selector {
            CacheSelector::All => {
                let count = self.entries.len();
                self.entries.clear();
                count
            }
            CacheSelector::One(id) => usize::from(self.entries.remove(id).is_some()),
            CacheSelector::Many(ids) => ids
                .iter()
                .filter(|id| self.entries.remove(id.as_str()).is_some())
                .count(),
        };

        tracing::debug!(selector = ?selector, removed = removed, "Cache entries deleted");
        selector
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
