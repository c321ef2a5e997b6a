//! System monitoring core functionality.
//!
//! This module provides the sampling and derivation engine: rate
//! computation from cumulative counters, rolling history, snapshot
//! assembly and threshold alerts with cooldown.

pub mod alerts;
mod collector;
mod history;
mod metrics;
mod process;
mod rate;
mod source;

pub use alerts::{
    classify, classify_battery, AlertEvaluator, AlertEvent, AlertMetric, AlertSeverity,
    AlertSink, LogSink, ThresholdConfig,
};
pub use collector::SystemMonitor;
pub use history::{HistoryBuffer, MetricsHistory, DEFAULT_HISTORY_SIZE};
pub use metrics::{
    clamp_percent, percent_of, BatteryMetrics, CpuMetrics, DiskMetrics, DiskUsage, IoCounters,
    MemoryMetrics, MetricSnapshot, NetworkCounters, NetworkMetrics, ProcessMetrics, SystemInfo,
};
pub use process::{rank_processes, ProcessSort};
pub use rate::{rate_per_sec, CounterPair, RateSampler};
pub use source::{CounterSource, SysinfoSource};
