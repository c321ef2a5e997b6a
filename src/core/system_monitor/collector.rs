use std::time::Instant;

use chrono::Utc;

use crate::core::config::Config;
use crate::error::Result;

use super::history::MetricsHistory;
use super::metrics::*;
use super::process::{rank_processes, ProcessSort};
use super::rate::RateSampler;
use super::source::{CounterSource, SysinfoSource};

/// Sampling and derivation engine
///
/// Each [`poll`](SystemMonitor::poll) reads the counter source once,
/// turns cumulative I/O counters into rates, records the charted values
/// into the rolling history and returns an immutable snapshot. The engine
/// owns its history and samplers; callers drive it from a single flow.
pub struct SystemMonitor<S: CounterSource = SysinfoSource> {
    source: S,
    disk_path: String,
    net_sent: RateSampler,
    net_recv: RateSampler,
    disk_read: RateSampler,
    disk_write: RateSampler,
    history: MetricsHistory,
}

impl SystemMonitor<SysinfoSource> {
    /// Monitor of the local host configured from `history_size` and `disk_path`
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            SysinfoSource::new(),
            config.history_size,
            config.disk_path.clone(),
        )
    }
}

impl<S: CounterSource> SystemMonitor<S> {
    pub fn new(source: S, history_size: usize, disk_path: impl Into<String>) -> Result<Self> {
        Self::new_at(source, history_size, disk_path, Instant::now())
    }

    /// Build the monitor and take the baseline counter readings as of `now`
    pub fn new_at(
        source: S,
        history_size: usize,
        disk_path: impl Into<String>,
        now: Instant,
    ) -> Result<Self> {
        let history = MetricsHistory::with_capacity(history_size)?;

        let mut monitor = Self {
            source,
            disk_path: disk_path.into(),
            net_sent: RateSampler::new(),
            net_recv: RateSampler::new(),
            disk_read: RateSampler::new(),
            disk_write: RateSampler::new(),
            history,
        };
        monitor.prime(now);
        Ok(monitor)
    }

    fn prime(&mut self, now: Instant) {
        self.source.refresh();

        match self.source.network_io() {
            Ok(net) => {
                self.net_sent.prime(net.bytes_sent, now);
                self.net_recv.prime(net.bytes_recv, now);
            }
            Err(e) => log::debug!("No network baseline: {}", e),
        }

        match self.source.disk_io() {
            Ok(io) => {
                self.disk_read.prime(io.read_bytes, now);
                self.disk_write.prime(io.write_bytes, now);
            }
            Err(e) => log::debug!("No disk I/O baseline: {}", e),
        }
    }

    /// Run one poll cycle now
    pub fn poll(&mut self, sort: ProcessSort, limit: usize) -> MetricSnapshot {
        self.poll_at(Instant::now(), sort, limit)
    }

    /// Run one poll cycle with `now` as the reading time for rate derivation.
    ///
    /// Failed counter reads are skipped; the affected fields stay zero.
    pub fn poll_at(&mut self, now: Instant, sort: ProcessSort, limit: usize) -> MetricSnapshot {
        self.source.refresh();

        let mut cpu = self.source.cpu();
        cpu.percent = clamp_percent(cpu.percent);
        cpu.per_core.iter_mut().for_each(|c| *c = clamp_percent(*c));

        let mut memory = self.source.memory();
        memory.percent = clamp_percent(memory.percent);
        memory.swap_percent = clamp_percent(memory.swap_percent);

        let snapshot = MetricSnapshot {
            timestamp: Utc::now(),
            cpu,
            memory,
            disk: self.collect_disk(now),
            network: self.collect_network(now),
            battery: self.source.battery(),
            processes: rank_processes(self.source.processes(), sort, limit),
        };

        self.history.record(&snapshot);
        snapshot
    }

    fn collect_disk(&mut self, now: Instant) -> DiskMetrics {
        let usage = self.source.disk_usage(&self.disk_path).unwrap_or_else(|e| {
            log::debug!("Disk usage for {} unavailable: {}", self.disk_path, e);
            DiskUsage::default()
        });

        let (read_rate, write_rate) = match self.source.disk_io() {
            Ok(io) => (
                self.disk_read.sample(io.read_bytes, now),
                self.disk_write.sample(io.write_bytes, now),
            ),
            Err(e) => {
                log::debug!("Disk I/O counters unavailable: {}", e);
                (0.0, 0.0)
            }
        };

        DiskMetrics {
            mount_point: usage.mount_point,
            total_bytes: usage.total_bytes,
            used_bytes: usage.used_bytes,
            free_bytes: usage.free_bytes,
            percent: clamp_percent(usage.percent),
            read_bytes_per_sec: read_rate,
            write_bytes_per_sec: write_rate,
        }
    }

    fn collect_network(&mut self, now: Instant) -> NetworkMetrics {
        match self.source.network_io() {
            Ok(net) => NetworkMetrics {
                bytes_sent: net.bytes_sent,
                bytes_recv: net.bytes_recv,
                packets_sent: net.packets_sent,
                packets_recv: net.packets_recv,
                sent_bytes_per_sec: self.net_sent.sample(net.bytes_sent, now),
                recv_bytes_per_sec: self.net_recv.sample(net.bytes_recv, now),
            },
            Err(e) => {
                log::debug!("Network counters unavailable: {}", e);
                NetworkMetrics::default()
            }
        }
    }

    pub fn history(&self) -> &MetricsHistory {
        &self.history
    }

    pub fn system_info(&self) -> SystemInfo {
        self.source.system_info()
    }

    pub fn disk_path(&self) -> &str {
        &self.disk_path
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
