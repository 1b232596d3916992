//! Notifier Adapter - 用户提示实现

mod broadcast_notifier;
mod tracing_notifier;

pub use broadcast_notifier::BroadcastNotifier;
pub use tracing_notifier::TracingNotifier;
