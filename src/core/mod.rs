// Core business logic module

pub mod config;
pub mod export;
pub mod system_monitor;

// Re-export commonly used items
pub use config::Config;
pub use export::{DataExporter, MetricsLogger};
pub use system_monitor::{AlertEvaluator, MetricSnapshot, SystemMonitor};
