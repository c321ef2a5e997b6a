//! Alert system for monitoring critical conditions.
//!
//! Compares snapshot values against configurable thresholds, suppresses
//! repeats of the same metric within a cooldown window and delivers each
//! fired event to every registered sink.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ResmonError, Result};

use super::metrics::{BatteryMetrics, MetricSnapshot};

/// Readings at or above this percentage are critical for CPU and memory
pub const CRITICAL_PERCENT: f32 = 95.0;

pub const DEFAULT_COOLDOWN_SECS: u64 = 300;

/// Metrics that can raise alerts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertMetric {
    Cpu,
    Memory,
    Disk,
    Battery,
}

impl AlertMetric {
    pub const ALL: [AlertMetric; 4] = [
        AlertMetric::Cpu,
        AlertMetric::Memory,
        AlertMetric::Disk,
        AlertMetric::Battery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertMetric::Cpu => "cpu",
            AlertMetric::Memory => "memory",
            AlertMetric::Disk => "disk",
            AlertMetric::Battery => "battery",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AlertMetric::Cpu => "High CPU Usage",
            AlertMetric::Memory => "High Memory Usage",
            AlertMetric::Disk => "Low Disk Space",
            AlertMetric::Battery => "Low Battery",
        }
    }
}

impl fmt::Display for AlertMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertMetric {
    type Err = ResmonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(AlertMetric::Cpu),
            "memory" => Ok(AlertMetric::Memory),
            "disk" => Ok(AlertMetric::Disk),
            "battery" => Ok(AlertMetric::Battery),
            other => Err(ResmonError::config(format!("unknown alert metric '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Warning => f.write_str("warning"),
            AlertSeverity::Critical => f.write_str("critical"),
        }
    }
}

/// Alert thresholds (percent, 0-100)
///
/// CPU, memory and disk alert above their limit; battery alerts below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_cpu")]
    pub cpu: f32,
    #[serde(default = "default_memory")]
    pub memory: f32,
    #[serde(default = "default_disk")]
    pub disk: f32,
    #[serde(default = "default_battery")]
    pub battery: f32,
}

fn default_cpu() -> f32 {
    85.0
}

fn default_memory() -> f32 {
    90.0
}

fn default_disk() -> f32 {
    95.0
}

fn default_battery() -> f32 {
    15.0
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            cpu: default_cpu(),
            memory: default_memory(),
            disk: default_disk(),
            battery: default_battery(),
        }
    }
}

impl ThresholdConfig {
    pub fn get(&self, metric: AlertMetric) -> f32 {
        match metric {
            AlertMetric::Cpu => self.cpu,
            AlertMetric::Memory => self.memory,
            AlertMetric::Disk => self.disk,
            AlertMetric::Battery => self.battery,
        }
    }

    pub fn set(&mut self, metric: AlertMetric, value: f32) {
        let slot = match metric {
            AlertMetric::Cpu => &mut self.cpu,
            AlertMetric::Memory => &mut self.memory,
            AlertMetric::Disk => &mut self.disk,
            AlertMetric::Battery => &mut self.battery,
        };
        *slot = value;
    }
}

/// A fired alert, handed to sinks and then dropped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub metric: AlertMetric,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub value: f32,
    pub threshold: f32,
    pub timestamp: DateTime<Utc>,
}

/// Receiver of fired alerts (notification, log, UI banner...)
pub trait AlertSink {
    fn handle(&self, event: &AlertEvent) -> Result<()>;
}

/// Sink that writes every alert to the log
#[derive(Debug, Default)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn handle(&self, event: &AlertEvent) -> Result<()> {
        match event.severity {
            AlertSeverity::Critical => log::error!("{}: {}", event.title, event.message),
            AlertSeverity::Warning => log::warn!("{}: {}", event.title, event.message),
        }
        Ok(())
    }
}

/// Severity an above-threshold reading would get, without touching cooldowns
///
/// Returns None when the reading does not breach its threshold.
pub fn classify(
    metric: AlertMetric,
    value: f32,
    thresholds: &ThresholdConfig,
) -> Option<AlertSeverity> {
    let limit = thresholds.get(metric);
    match metric {
        AlertMetric::Cpu | AlertMetric::Memory if value > limit => {
            if value < CRITICAL_PERCENT {
                Some(AlertSeverity::Warning)
            } else {
                Some(AlertSeverity::Critical)
            }
        }
        AlertMetric::Disk if value > limit => Some(AlertSeverity::Critical),
        AlertMetric::Battery if value < limit => Some(AlertSeverity::Warning),
        _ => None,
    }
}

/// Severity of the battery state; only a discharging battery can breach
pub fn classify_battery(
    battery: &BatteryMetrics,
    thresholds: &ThresholdConfig,
) -> Option<AlertSeverity> {
    if battery.plugged {
        return None;
    }
    classify(AlertMetric::Battery, battery.percent, thresholds)
}

/// Threshold evaluator with per-metric cooldown
///
/// A metric is quiet until it breaches and fires; it then stays cooling
/// down until `cooldown_secs` have elapsed since the last firing, checked
/// lazily on the next evaluation.
pub struct AlertEvaluator {
    thresholds: ThresholdConfig,
    cooldown_secs: u64,
    last_fired: HashMap<AlertMetric, DateTime<Utc>>,
    sinks: Vec<Box<dyn AlertSink>>,
}

impl AlertEvaluator {
    pub fn new(thresholds: ThresholdConfig, cooldown_secs: u64) -> Self {
        Self {
            thresholds,
            cooldown_secs,
            last_fired: HashMap::new(),
            sinks: Vec::new(),
        }
    }

    pub fn register_sink(&mut self, sink: Box<dyn AlertSink>) {
        self.sinks.push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    pub fn threshold(&self, metric: AlertMetric) -> f32 {
        self.thresholds.get(metric)
    }

    pub fn set_threshold(&mut self, metric: AlertMetric, value: f32) {
        self.thresholds.set(metric, value);
    }

    pub fn cooldown_secs(&self) -> u64 {
        self.cooldown_secs
    }

    /// Forget when `metric` (or every metric) last fired
    pub fn reset_cooldown(&mut self, metric: Option<AlertMetric>) {
        match metric {
            Some(metric) => {
                self.last_fired.remove(&metric);
            }
            None => self.last_fired.clear(),
        }
    }

    pub fn last_fired(&self, metric: AlertMetric) -> Option<DateTime<Utc>> {
        self.last_fired.get(&metric).copied()
    }

    pub fn is_cooling_down(&self, metric: AlertMetric, now: DateTime<Utc>) -> bool {
        !self.cooldown_elapsed(metric, now)
    }

    /// Evaluate a snapshot at the current time
    pub fn evaluate(&mut self, snapshot: &MetricSnapshot) -> Vec<AlertEvent> {
        self.evaluate_at(snapshot, Utc::now())
    }

    /// Evaluate a snapshot as of `now`, deliver fired events to every sink
    /// and return them.
    pub fn evaluate_at(
        &mut self,
        snapshot: &MetricSnapshot,
        now: DateTime<Utc>,
    ) -> Vec<AlertEvent> {
        let mut readings = vec![
            (AlertMetric::Cpu, snapshot.cpu.percent),
            (AlertMetric::Memory, snapshot.memory.percent),
            (AlertMetric::Disk, snapshot.disk.percent),
        ];
        if let Some(battery) = snapshot.battery.as_ref().filter(|b| !b.plugged) {
            readings.push((AlertMetric::Battery, battery.percent));
        }

        let mut events = Vec::new();
        for (metric, value) in readings {
            let Some(severity) = classify(metric, value, &self.thresholds) else {
                continue;
            };
            if !self.cooldown_elapsed(metric, now) {
                continue;
            }
            self.last_fired.insert(metric, now);
            events.push(self.build_event(metric, severity, value, now));
        }

        for event in &events {
            self.dispatch(event);
        }

        events
    }

    fn cooldown_elapsed(&self, metric: AlertMetric, now: DateTime<Utc>) -> bool {
        match self.last_fired.get(&metric) {
            Some(last) => {
                let elapsed_ms = now.signed_duration_since(*last).num_milliseconds();
                elapsed_ms >= (self.cooldown_secs as i64).saturating_mul(1000)
            }
            None => true,
        }
    }

    fn build_event(
        &self,
        metric: AlertMetric,
        severity: AlertSeverity,
        value: f32,
        now: DateTime<Utc>,
    ) -> AlertEvent {
        let message = match metric {
            AlertMetric::Cpu => format!("CPU usage is at {:.1}%", value),
            AlertMetric::Memory => format!("Memory usage is at {:.1}%", value),
            AlertMetric::Disk => format!("Disk usage is at {:.1}%", value),
            AlertMetric::Battery => format!("Battery is at {:.0}%", value),
        };

        AlertEvent {
            metric,
            severity,
            title: metric.title().to_string(),
            message,
            value,
            threshold: self.thresholds.get(metric),
            timestamp: now,
        }
    }

    fn dispatch(&self, event: &AlertEvent) {
        for (index, sink) in self.sinks.iter().enumerate() {
            if let Err(e) = sink.handle(event) {
                log::error!("Alert sink #{} failed on {} alert: {}", index, event.metric, e);
            }
        }
    }
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new(ThresholdConfig::default(), DEFAULT_COOLDOWN_SECS)
    }
}
