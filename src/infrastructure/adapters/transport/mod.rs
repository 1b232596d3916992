//! Transport Adapter - reqwest 实现与测试用 fake

mod fake_transport;
mod reqwest_transport;

pub use fake_transport::{FakeReply, FakeRoute, FakeTransport};
pub use reqwest_transport::*;
