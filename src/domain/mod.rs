//! Domain Layer - 领域层
//!
//! 不涉及 I/O 的纯逻辑:
//! - Request Context: 方法、配置、指纹
//! - Encoder: 查询串编码与路径变量替换

pub mod request;

mod encoder;

pub use encoder::{append_query, encode_query, interpolate};
pub use request::{fingerprint, Method, PayloadMode, RequestFlags, RequestOptions};
