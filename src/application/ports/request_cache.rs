//! Request Cache Port - request id 到 promise 的缓存
//!
//! 所有操作都不会失败，缺失用 `None` 表示

use async_trait::async_trait;

use crate::application::pending::PendingRequest;

/// 删除目标：全部、单个或多个 id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheSelector {
    All,
    One(String),
    Many(Vec<String>),
}

impl From<&str> for CacheSelector {
    fn from(id: &str) -> Self {
        CacheSelector::One(id.to_string())
    }
}

impl From<String> for CacheSelector {
    fn from(id: String) -> Self {
        CacheSelector::One(id)
    }
}

impl From<Vec<String>> for CacheSelector {
    fn from(ids: Vec<String>) -> Self {
        CacheSelector::Many(ids)
    }
}

impl From<&[&str]> for CacheSelector {
    fn from(ids: &[&str]) -> Self {
        CacheSelector::Many(ids.iter().map(|id| id.to_string()).collect())
    }
}

/// Request Cache Port
///
/// 同一 request id 最多一个条目，`set` 直接替换
#[async_trait]
pub trait RequestCachePort: Send + Sync {
    fn get(&self, request_id: &str) -> Option<PendingRequest>;

    /// 所有缓存的 promise，顺序不保证
    fn get_all(&self) -> Vec<PendingRequest>;

    fn set(&self, request_id: &str, pending: PendingRequest);

    /// 删除匹配的条目，忽略不存在的 id，原样返回参数
    async fn delete(&self, selector: CacheSelector) -> CacheSelector;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
