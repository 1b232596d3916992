//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod memory;

use std::sync::Arc;

use crate::application::ports::{NotifierPort, TransportPort};
use crate::application::{ClientSettings, RequestClient};

pub use adapters::{BroadcastNotifier, FakeTransport, ReqwestTransport, TracingNotifier};
pub use memory::{InMemoryRequestCache, InMemoryRequestQueue};

/// 使用内存缓存和队列创建客户端
pub fn build_client(
    settings: ClientSettings,
    transport: Arc<dyn TransportPort>,
    notifier: Arc<dyn NotifierPort>,
) -> Arc<RequestClient> {
    RequestClient::new(
        settings,
        transport,
        notifier,
        Arc::new(InMemoryRequestCache::new()),
        Arc::new(InMemoryRequestQueue::new()),
    )
    .arc()
}
