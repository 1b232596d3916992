//! Memory Layer - In-Memory State Management
//!
//! 实现 RequestCache 和 RequestQueue，管理请求 promise 和在途请求的内存状态

mod request_cache;
mod request_queue;

pub use request_cache::InMemoryRequestCache;
pub use request_queue::InMemoryRequestQueue;
