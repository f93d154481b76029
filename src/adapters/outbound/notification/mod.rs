/// Notification bus adapters
mod collecting_bus;
mod json_lines_bus;
mod tracing_bus;

pub use collecting_bus::CollectingNotificationBus;
pub use json_lines_bus::JsonLinesNotificationBus;
pub use tracing_bus::TracingNotificationBus;
