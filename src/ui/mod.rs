// UI and formatting module

pub mod formatters;
pub mod monitor_tui;
pub mod status_bar;

// Re-export commonly used items for cleaner imports
pub use formatters::{format_bytes, format_duration, format_speed};
