//! One-line resource summary for the `bar` view.

use crossterm::event::KeyCode;

use crate::core::system_monitor::{
    classify_battery, BatteryMetrics, MetricSnapshot, ThresholdConfig,
};
use crate::ui::formatters::format_speed;

/// Key actions of the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarAction {
    OpenDashboard,
    Export,
    ShowPreferences,
    Quit,
    None,
}

impl BarAction {
    pub fn from_key(code: KeyCode) -> Self {
        match code {
            KeyCode::Char('d') => BarAction::OpenDashboard,
            KeyCode::Char('e') => BarAction::Export,
            KeyCode::Char('p') => BarAction::ShowPreferences,
            KeyCode::Char('q') | KeyCode::Esc => BarAction::Quit,
            _ => BarAction::None,
        }
    }
}

/// Traffic-light icon for CPU load: green up to 50%, yellow up to 80%, red above
pub fn cpu_icon(percent: f32) -> &'static str {
    if percent > 80.0 {
        "🔴"
    } else if percent > 50.0 {
        "🟡"
    } else {
        "🟢"
    }
}

/// Battery glyph; low-battery state comes from the alert thresholds
pub fn battery_glyph(battery: &BatteryMetrics, thresholds: &ThresholdConfig) -> &'static str {
    match classify_battery(battery, thresholds) {
        Some(_) => "🪫",
        None if battery.plugged => "🔌",
        None => "🔋",
    }
}

/// Compact summary line, e.g. `⚡ 12.3% 🟢 │ 🧠 48.0% │ 💾 71.2% │ ⬆ 1.20 kB/s ⬇ 30.00 kB/s │ 🔋 80%`
pub fn summary_line(snapshot: &MetricSnapshot, thresholds: &ThresholdConfig) -> String {
    let mut line = format!(
        "⚡ {:.1}% {} │ 🧠 {:.1}% │ 💾 {:.1}% │ ⬆ {} ⬇ {}",
        snapshot.cpu.percent,
        cpu_icon(snapshot.cpu.percent),
        snapshot.memory.percent,
        snapshot.disk.percent,
        format_speed(snapshot.network.sent_bytes_per_sec),
        format_speed(snapshot.network.recv_bytes_per_sec),
    );

    if let Some(battery) = &snapshot.battery {
        line.push_str(&format!(
            " │ {} {:.0}%",
            battery_glyph(battery, thresholds),
            battery.percent
        ));
    }

    line
}
