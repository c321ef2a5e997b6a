//! Terminal User Interface for system monitoring.
//!
//! Provides a real-time dashboard using ratatui.

mod app;
mod event_handler;
mod render;
mod widgets;

pub use app::{run_monitor_app, MonitorApp, Tab, MAX_PROCESS_LIMIT, MIN_PROCESS_LIMIT};
pub use event_handler::MonitorEvent;
