//! Scripted in-memory counter source for deterministic polls.

use std::collections::VecDeque;

use resmon::core::system_monitor::{
    BatteryMetrics, CounterSource, CpuMetrics, DiskUsage, IoCounters, MemoryMetrics,
    NetworkCounters, ProcessMetrics, SystemInfo,
};
use resmon::{ResmonError, Result};

/// Host state returned between two refreshes
#[derive(Debug, Clone, Default)]
pub struct Reading {
    pub cpu: f32,
    pub memory: f32,
    pub disk: f32,
    /// None simulates an unreadable counter
    pub network: Option<NetworkCounters>,
    pub disk_io: Option<IoCounters>,
    pub battery: Option<BatteryMetrics>,
    pub processes: Vec<ProcessMetrics>,
}

impl Reading {
    pub fn usage(cpu: f32, memory: f32, disk: f32) -> Self {
        Self {
            cpu,
            memory,
            disk,
            network: Some(NetworkCounters::default()),
            disk_io: Some(IoCounters::default()),
            ..Default::default()
        }
    }

    pub fn counters(sent: u64, recv: u64, read: u64, write: u64) -> Self {
        Self {
            network: Some(NetworkCounters {
                bytes_sent: sent,
                bytes_recv: recv,
                packets_sent: sent / 100,
                packets_recv: recv / 100,
            }),
            disk_io: Some(IoCounters {
                read_bytes: read,
                write_bytes: write,
            }),
            ..Default::default()
        }
    }
}

/// Each `refresh` advances to the next scripted reading; the last one
/// repeats once the script runs out.
pub struct ScriptedSource {
    script: VecDeque<Reading>,
    current: Reading,
    pub refreshes: usize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Reading>) -> Self {
        Self {
            script: script.into(),
            current: Reading::default(),
            refreshes: 0,
        }
    }
}

impl CounterSource for ScriptedSource {
    fn refresh(&mut self) {
        self.refreshes += 1;
        if let Some(next) = self.script.pop_front() {
            self.current = next;
        }
    }

    fn cpu(&self) -> CpuMetrics {
        CpuMetrics {
            percent: self.current.cpu,
            per_core: vec![self.current.cpu; 2],
            physical_cores: 2,
            threads: 4,
            frequency_mhz: 2400,
        }
    }

    fn memory(&self) -> MemoryMetrics {
        let total = 16 * 1024 * 1024 * 1024u64;
        let used = (total as f64 * self.current.memory.clamp(0.0, 100.0) as f64 / 100.0) as u64;
        MemoryMetrics {
            total_bytes: total,
            used_bytes: used,
            available_bytes: total - used,
            percent: self.current.memory,
            ..Default::default()
        }
    }

    fn disk_usage(&self, path: &str) -> Result<DiskUsage> {
        let total = 500 * 1024 * 1024 * 1024u64;
        let used = (total as f64 * self.current.disk.clamp(0.0, 100.0) as f64 / 100.0) as u64;
        Ok(DiskUsage {
            mount_point: path.to_string(),
            total_bytes: total,
            used_bytes: used,
            free_bytes: total - used,
            percent: self.current.disk,
        })
    }

    fn disk_io(&self) -> Result<IoCounters> {
        self.current
            .disk_io
            .ok_or_else(|| ResmonError::counter_read("disk I/O counters unavailable"))
    }

    fn network_io(&self) -> Result<NetworkCounters> {
        self.current
            .network
            .ok_or_else(|| ResmonError::counter_read("network counters unavailable"))
    }

    fn battery(&mut self) -> Option<BatteryMetrics> {
        self.current.battery.clone()
    }

    fn processes(&self) -> Vec<ProcessMetrics> {
        self.current.processes.clone()
    }

    fn system_info(&self) -> SystemInfo {
        SystemInfo {
            os_name: "TestOS".to_string(),
            os_version: "1.0".to_string(),
            kernel_version: "1.0.0".to_string(),
            architecture: "x86_64".to_string(),
            hostname: "test-host".to_string(),
            cpu_brand: "Test CPU".to_string(),
            boot_time: 1_700_000_000,
            uptime_secs: 3600,
        }
    }
}

pub fn process(pid: u32, name: &str, cpu: f32, memory: f32) -> ProcessMetrics {
    ProcessMetrics {
        pid,
        name: name.to_string(),
        cpu_percent: cpu,
        memory_percent: memory,
        status: "Run".to_string(),
    }
}
