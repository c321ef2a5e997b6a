//! OS counter sources.
//!
//! [`CounterSource`] is the seam between the monitor engine and the host.
//! [`SysinfoSource`] reads the real host through `sysinfo` and `battery`.

use std::path::Path;

use sysinfo::{
    CpuRefreshKind, Disks, MemoryRefreshKind, Networks, ProcessRefreshKind, RefreshKind, System,
};

use crate::error::{ResmonError, Result};

use super::metrics::*;

/// Supplier of raw host readings
///
/// Implementations must report cumulative byte counters for disk and
/// network I/O; rates are derived by the engine.
pub trait CounterSource {
    /// Re-read the underlying OS state. Called once at the start of a poll.
    fn refresh(&mut self);

    fn cpu(&self) -> CpuMetrics;

    fn memory(&self) -> MemoryMetrics;

    /// Space usage of the filesystem holding `path`
    fn disk_usage(&self, path: &str) -> Result<DiskUsage>;

    fn disk_io(&self) -> Result<IoCounters>;

    fn network_io(&self) -> Result<NetworkCounters>;

    /// None when the host has no battery or it cannot be read
    fn battery(&mut self) -> Option<BatteryMetrics>;

    /// Live process table in enumeration (ascending pid) order.
    /// Processes that vanish or cannot be read are skipped.
    fn processes(&self) -> Vec<ProcessMetrics>;

    fn system_info(&self) -> SystemInfo;
}

/// Host counter source backed by `sysinfo` and the `battery` crate
pub struct SysinfoSource {
    system: System,
    disks: Disks,
    networks: Networks,
    battery_manager: Option<battery::Manager>,
}

impl SysinfoSource {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything())
            .with_processes(ProcessRefreshKind::nothing().with_cpu().with_memory());

        let system = System::new_with_specifics(refresh_kind);
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();

        let battery_manager = match battery::Manager::new() {
            Ok(manager) => Some(manager),
            Err(e) => {
                log::debug!("Battery manager unavailable: {}", e);
                None
            }
        };

        Self {
            system,
            disks,
            networks,
            battery_manager,
        }
    }

    /// First battery of the host; Ok(None) when there is none
    fn read_battery(&self) -> Result<Option<BatteryMetrics>> {
        use battery::units::ratio::percent;
        use battery::units::time::second;

        let Some(manager) = self.battery_manager.as_ref() else {
            return Ok(None);
        };
        let mut batteries = manager
            .batteries()
            .map_err(|e| ResmonError::battery(format!("enumeration failed: {}", e)))?;
        let device = match batteries.next() {
            Some(device) => {
                device.map_err(|e| ResmonError::battery(format!("read failed: {}", e)))?
            }
            None => return Ok(None),
        };

        let plugged = is_plugged(device.state());
        let time_left_secs = if plugged {
            None
        } else {
            device
                .time_to_empty()
                .map(|t| t.get::<second>().max(0.0) as u64)
        };

        Ok(Some(BatteryMetrics {
            percent: clamp_percent(device.state_of_charge().get::<percent>()),
            plugged,
            time_left_secs,
        }))
    }
}

/// An empty battery is not charging either, so it counts as unplugged
fn is_plugged(state: battery::State) -> bool {
    !matches!(state, battery::State::Discharging | battery::State::Empty)
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSource for SysinfoSource {
    fn refresh(&mut self) {
        self.system.refresh_all();
        self.disks.refresh(true);
        self.networks.refresh(true);
    }

    fn cpu(&self) -> CpuMetrics {
        let cpus = self.system.cpus();
        let frequency_mhz = if cpus.is_empty() {
            0
        } else {
            cpus.iter().map(|cpu| cpu.frequency()).sum::<u64>() / cpus.len() as u64
        };

        CpuMetrics {
            percent: clamp_percent(self.system.global_cpu_usage()),
            per_core: cpus.iter().map(|cpu| clamp_percent(cpu.cpu_usage())).collect(),
            physical_cores: System::physical_core_count().unwrap_or(cpus.len()),
            threads: cpus.len(),
            frequency_mhz,
        }
    }

    fn memory(&self) -> MemoryMetrics {
        let total = self.system.total_memory();
        let used = self.system.used_memory();
        let swap_total = self.system.total_swap();
        let swap_used = self.system.used_swap();

        MemoryMetrics {
            total_bytes: total,
            used_bytes: used,
            available_bytes: self.system.available_memory(),
            percent: percent_of(used, total),
            swap_total_bytes: swap_total,
            swap_used_bytes: swap_used,
            swap_percent: percent_of(swap_used, swap_total),
        }
    }

    fn disk_usage(&self, path: &str) -> Result<DiskUsage> {
        let target = Path::new(path);

        // Deepest mount point containing the path, else the first disk
        let disk = self
            .disks
            .iter()
            .filter(|disk| target.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())
            .or_else(|| self.disks.iter().next())
            .ok_or_else(|| ResmonError::counter_read("no disks reported by the OS"))?;

        let total = disk.total_space();
        let free = disk.available_space();
        let used = total.saturating_sub(free);

        Ok(DiskUsage {
            mount_point: disk.mount_point().to_string_lossy().to_string(),
            total_bytes: total,
            used_bytes: used,
            free_bytes: free,
            percent: percent_of(used, total),
        })
    }

    fn disk_io(&self) -> Result<IoCounters> {
        if self.disks.list().is_empty() {
            return Err(ResmonError::counter_read("no disks reported by the OS"));
        }

        Ok(self
            .disks
            .iter()
            .map(|disk| disk.usage())
            .fold(IoCounters::default(), |acc, usage| IoCounters {
                read_bytes: acc.read_bytes.saturating_add(usage.total_read_bytes),
                write_bytes: acc.write_bytes.saturating_add(usage.total_written_bytes),
            }))
    }

    fn network_io(&self) -> Result<NetworkCounters> {
        if self.networks.is_empty() {
            return Err(ResmonError::counter_read("no network interfaces"));
        }

        Ok(self
            .networks
            .values()
            .fold(NetworkCounters::default(), |acc, data| NetworkCounters {
                bytes_sent: acc.bytes_sent.saturating_add(data.total_transmitted()),
                bytes_recv: acc.bytes_recv.saturating_add(data.total_received()),
                packets_sent: acc.packets_sent.saturating_add(data.total_packets_transmitted()),
                packets_recv: acc.packets_recv.saturating_add(data.total_packets_received()),
            }))
    }

    fn battery(&mut self) -> Option<BatteryMetrics> {
        match self.read_battery() {
            Ok(reading) => reading,
            Err(e) => {
                log::debug!("{}", e);
                None
            }
        }
    }

    fn processes(&self) -> Vec<ProcessMetrics> {
        let total_memory = self.system.total_memory();
        let mut processes: Vec<_> = self
            .system
            .processes()
            .values()
            .map(|proc| ProcessMetrics {
                pid: proc.pid().as_u32(),
                name: proc.name().to_string_lossy().to_string(),
                cpu_percent: proc.cpu_usage().max(0.0),
                memory_percent: percent_of(proc.memory(), total_memory),
                status: format!("{:?}", proc.status()),
            })
            .collect();

        processes.sort_by_key(|p| p.pid);
        processes
    }

    fn system_info(&self) -> SystemInfo {
        let cpu_brand = self
            .system
            .cpus()
            .first()
            .map(|c| c.brand().trim().to_string())
            .unwrap_or_default();

        SystemInfo {
            os_name: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
            architecture: std::env::consts::ARCH.to_string(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
            cpu_brand,
            boot_time: System::boot_time() as i64,
            uptime_secs: System::uptime(),
        }
    }
}
