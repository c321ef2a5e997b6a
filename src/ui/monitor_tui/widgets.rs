use ratatui::{prelude::*, widgets::Gauge};

use crate::core::system_monitor::AlertSeverity;

/// Create a gauge with color based on value thresholds
pub fn colored_gauge<'a>(value: f64, label: &'a str) -> Gauge<'a> {
    Gauge::default()
        .gauge_style(Style::default().fg(usage_color(value)).bg(Color::Black))
        .ratio((value / 100.0).clamp(0.0, 1.0))
        .label(label)
}

/// Color for a usage percentage
pub fn usage_color(value: f64) -> Color {
    match value {
        v if v < 50.0 => Color::Cyan,
        v if v < 75.0 => Color::LightYellow,
        v if v < 90.0 => Color::LightRed,
        _ => Color::Red,
    }
}

/// Color for a battery charge, green when plugged in
pub fn battery_color(percent: f32, plugged: bool) -> Color {
    if plugged {
        Color::Green
    } else if percent < 20.0 {
        Color::Red
    } else if percent < 50.0 {
        Color::Yellow
    } else {
        Color::Green
    }
}

pub fn severity_style(severity: AlertSeverity) -> (&'static str, Color) {
    match severity {
        AlertSeverity::Critical => ("🔴", Color::Red),
        AlertSeverity::Warning => ("⚠ ", Color::Yellow),
    }
}
