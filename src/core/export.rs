//! Snapshot export and continuous metric logging.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::system_monitor::{
    BatteryMetrics, CpuMetrics, DiskMetrics, MemoryMetrics, MetricSnapshot, NetworkMetrics,
    ProcessMetrics, SystemInfo,
};
use crate::error::{ResmonError, Result};

/// Fixed column order of the metrics log
pub const LOG_COLUMNS: [&str; 6] = [
    "timestamp",
    "cpu_percent",
    "memory_percent",
    "disk_percent",
    "network_upload_bps",
    "network_download_bps",
];

pub const DEFAULT_MAX_ENTRIES: usize = 1000;

fn file_stamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

fn documents_subdir(name: &str) -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(name)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        ResmonError::export(format!("cannot create directory {}: {}", dir.display(), e))
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Quote a CSV field when it contains a separator, quote or newline
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

fn csv_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => csv_field(s),
        other => csv_field(&other.to_string()),
    }
}

/// Full state document written by [`DataExporter::create_snapshot`]
#[derive(Debug, Serialize)]
pub struct SnapshotDocument<'a> {
    pub timestamp: String,
    pub cpu: &'a CpuMetrics,
    pub memory: &'a MemoryMetrics,
    pub disk: &'a DiskMetrics,
    pub network: &'a NetworkMetrics,
    pub battery: &'a Option<BatteryMetrics>,
    pub system_info: &'a SystemInfo,
    pub top_processes: &'a [ProcessMetrics],
}

/// Writes JSON and CSV exports into one directory
#[derive(Debug, Clone)]
pub struct DataExporter {
    export_dir: PathBuf,
}

impl DataExporter {
    /// Exporter writing to `~/Documents/ResourceMonitor_Exports`
    pub fn new() -> Self {
        Self::with_dir(documents_subdir("ResourceMonitor_Exports"))
    }

    pub fn with_dir(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Write `data` as pretty JSON. Default name: `resource_monitor_<stamp>.json`
    pub fn export_json<T: Serialize>(&self, data: &T, filename: Option<&str>) -> Result<PathBuf> {
        ensure_dir(&self.export_dir)?;
        let filename = filename
            .map(str::to_string)
            .unwrap_or_else(|| format!("resource_monitor_{}.json", file_stamp()));
        let path = self.export_dir.join(filename);

        let body = serde_json::to_string_pretty(data)?;
        fs::write(&path, body)?;
        log::info!("Exported JSON to {}", path.display());
        Ok(path)
    }

    /// Write rows as CSV with the sorted union of their keys as header.
    ///
    /// Nothing is written when `rows` is empty; the target path is still
    /// returned.
    pub fn export_rows_csv(
        &self,
        rows: &[Map<String, Value>],
        filename: Option<&str>,
    ) -> Result<PathBuf> {
        let filename = filename
            .map(str::to_string)
            .unwrap_or_else(|| format!("resource_monitor_{}.csv", file_stamp()));
        let path = self.export_dir.join(filename);

        if rows.is_empty() {
            return Ok(path);
        }
        ensure_dir(&self.export_dir)?;

        let columns: BTreeSet<&str> = rows
            .iter()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect();

        let mut out = fs::File::create(&path)?;
        let header: Vec<String> = columns.iter().map(|c| csv_field(c)).collect();
        writeln!(out, "{}", header.join(","))?;
        for row in rows {
            let line: Vec<String> = columns
                .iter()
                .map(|c| row.get(*c).map(csv_value).unwrap_or_default())
                .collect();
            writeln!(out, "{}", line.join(","))?;
        }

        log::info!("Exported {} rows to {}", rows.len(), path.display());
        Ok(path)
    }

    /// Write the complete current state as `snapshot_<stamp>.json`
    pub fn create_snapshot(
        &self,
        snapshot: &MetricSnapshot,
        system_info: &SystemInfo,
    ) -> Result<PathBuf> {
        let document = SnapshotDocument {
            timestamp: snapshot
                .timestamp
                .with_timezone(&Local)
                .to_rfc3339_opts(SecondsFormat::Secs, false),
            cpu: &snapshot.cpu,
            memory: &snapshot.memory,
            disk: &snapshot.disk,
            network: &snapshot.network,
            battery: &snapshot.battery,
            system_info,
            top_processes: &snapshot.processes,
        };

        self.export_json(&document, Some(&format!("snapshot_{}.json", file_stamp())))
    }
}

impl Default for DataExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// One row of the metrics log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub network_upload_bps: f64,
    pub network_download_bps: f64,
}

impl LogEntry {
    fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            csv_field(&self.timestamp),
            self.cpu_percent,
            self.memory_percent,
            self.disk_percent,
            self.network_upload_bps,
            self.network_download_bps
        )
    }
}

/// Buffers metric rows and flushes them to `metrics_log_<stamp>.csv`
#[derive(Debug)]
pub struct MetricsLogger {
    log_dir: PathBuf,
    max_entries: usize,
    current_log: Vec<LogEntry>,
}

impl MetricsLogger {
    /// Logger writing to [`default_dir`](Self::default_dir)
    pub fn new() -> Self {
        Self::with_dir(Self::default_dir(), DEFAULT_MAX_ENTRIES)
    }

    /// `~/Documents/ResourceMonitor_Logs`
    pub fn default_dir() -> PathBuf {
        documents_subdir("ResourceMonitor_Logs")
    }

    pub fn with_dir(log_dir: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            log_dir: log_dir.into(),
            max_entries: max_entries.max(1),
            current_log: Vec::new(),
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Buffer one row; returns the file written when the buffer filled up
    pub fn log_metrics(
        &mut self,
        cpu: f64,
        memory: f64,
        disk: f64,
        network_up: f64,
        network_down: f64,
    ) -> Result<Option<PathBuf>> {
        self.current_log.push(LogEntry {
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Micros, false),
            cpu_percent: round2(cpu),
            memory_percent: round2(memory),
            disk_percent: round2(disk),
            network_upload_bps: round2(network_up),
            network_download_bps: round2(network_down),
        });

        if self.current_log.len() >= self.max_entries {
            return self.save_log();
        }
        Ok(None)
    }

    pub fn log_snapshot(&mut self, snapshot: &MetricSnapshot) -> Result<Option<PathBuf>> {
        self.log_metrics(
            snapshot.cpu.percent as f64,
            snapshot.memory.percent as f64,
            snapshot.disk.percent as f64,
            snapshot.network.sent_bytes_per_sec,
            snapshot.network.recv_bytes_per_sec,
        )
    }

    /// Write the buffered rows and clear the buffer. None when empty.
    pub fn save_log(&mut self) -> Result<Option<PathBuf>> {
        if self.current_log.is_empty() {
            return Ok(None);
        }
        ensure_dir(&self.log_dir)?;

        let mut path = self.log_dir.join(format!("metrics_log_{}.csv", file_stamp()));
        // Two flushes within the same second must not overwrite each other
        let mut suffix = 1;
        while path.exists() {
            path = self
                .log_dir
                .join(format!("metrics_log_{}_{}.csv", file_stamp(), suffix));
            suffix += 1;
        }

        let mut out = fs::File::create(&path)?;
        writeln!(out, "{}", LOG_COLUMNS.join(","))?;
        for entry in &self.current_log {
            writeln!(out, "{}", entry.to_csv_line())?;
        }

        log::info!(
            "Saved {} metric rows to {}",
            self.current_log.len(),
            path.display()
        );
        self.current_log.clear();
        Ok(Some(path))
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.current_log
    }

    pub fn log_count(&self) -> usize {
        self.current_log.len()
    }
}

impl Default for MetricsLogger {
    fn default() -> Self {
        Self::new()
    }
}
