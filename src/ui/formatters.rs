use chrono::{DateTime, Local, TimeZone};
use humansize::{format_size, FormatSizeOptions, WINDOWS};

/// Format a byte count with 1024-based units and two decimals (B, kB, MB, GB, ...)
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, FormatSizeOptions::from(WINDOWS).decimal_zeroes(2))
}

/// Format a byte rate, e.g. "1.50 MB/s". Negative or NaN rates show as 0.
pub fn format_speed(bytes_per_sec: f64) -> String {
    let bytes = if bytes_per_sec.is_finite() && bytes_per_sec > 0.0 {
        bytes_per_sec as u64
    } else {
        0
    };
    format!("{}/s", format_bytes(bytes))
}

/// Format a duration in seconds (e.g. "3d 4h", "2h 5m", "7m")
pub fn format_duration(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format a Unix timestamp in local time (YYYY-MM-DD HH:MM)
pub fn format_timestamp(unix_secs: i64) -> String {
    match Local.timestamp_opt(unix_secs, 0).single() {
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M").to_string(),
        None => "Unknown".to_string(),
    }
}

/// Format a UTC instant as local wall-clock time (HH:MM:SS)
pub fn format_clock<Tz: TimeZone>(time: &DateTime<Tz>) -> String {
    time.with_timezone(&Local).format("%H:%M:%S").to_string()
}
