//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod notifier;
pub mod transport;

pub use notifier::*;
pub use transport::*;
