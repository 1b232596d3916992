//! reqlayer - HTTP 请求编排层
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Request Context: 方法、调用配置、请求指纹
//! - Encoder: 查询串编码、路径变量替换
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Transport, Notifier, RequestCache, RequestQueue）
//! - RequestClient: 去重、缓存、取消、结果归一化
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: reqwest transport、fake transport、提示发布
//! - Memory: 内存请求缓存与在途队列

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{
    Endpoint, ErrorKind, PendingRequest, RequestClient, RequestError, RequestResult,
    ResponseValue,
};
pub use config::{load_config, AppConfig};
pub use domain::{Method, RequestOptions};
pub use infrastructure::build_client;
