//! Request Context - 请求限界上下文
//!
//! 职责:
//! - HTTP 方法与参数传递方式
//! - 调用配置与默认开关
//! - 去重/取消使用的请求指纹

mod fingerprint;
mod options;
mod value_objects;

pub use fingerprint::fingerprint;
pub use options::{RequestFlags, RequestOptions};
pub use value_objects::{Method, PayloadMode};
