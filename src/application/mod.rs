//! 应用层 - 请求编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Transport、Notifier、RequestCache、RequestQueue）
//! - resolver: 配置解析，生成请求描述符
//! - normalizer: 响应/错误归一化与用户提示策略
//! - client: 编排核心（去重、缓存、取消）
//! - error: 请求错误定义

pub mod cancel;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod normalizer;
pub mod pending;
pub mod ports;
pub mod resolver;
pub mod response;

pub use cancel::CancelContext;
pub use client::{ClientSettings, RequestClient};
pub use endpoint::Endpoint;
pub use error::{ErrorKind, HttpStatusError, RequestError};
pub use normalizer::ResponseNormalizer;
pub use pending::{PendingRequest, RequestResult};
pub use ports::{
    CacheSelector, Notification, NotifierPort, QueueEntry, RequestCachePort, RequestQueuePort,
    ResponseBody, TransportError, TransportPort, TransportRequest, TransportResponse,
};
pub use resolver::{ConfigResolver, RequestDescriptor};
pub use response::ResponseValue;
