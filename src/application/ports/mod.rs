//! Application Ports - 出站端口定义
//!
//! 定义编排层与基础设施层的抽象接口

mod notifier;
mod request_cache;
mod request_queue;
mod transport;

pub use notifier::{Notification, NotifierPort};
pub use request_cache::{CacheSelector, RequestCachePort};
pub use request_queue::{QueueEntry, RequestQueuePort};
pub use transport::{
    ResponseBody, TransportError, TransportPort, TransportRequest, TransportResponse,
};
