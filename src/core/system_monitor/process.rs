//! Process list ranking.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::metrics::ProcessMetrics;

/// Sort key for the process table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessSort {
    /// CPU usage, descending
    #[default]
    Cpu,
    /// Memory usage, descending
    Memory,
    /// Name, case-insensitive ascending
    Name,
    /// Enumeration order
    #[serde(rename = "none")]
    Unsorted,
}

impl ProcessSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessSort::Cpu => "cpu",
            ProcessSort::Memory => "memory",
            ProcessSort::Name => "name",
            ProcessSort::Unsorted => "none",
        }
    }

    /// Cycle through the user-selectable keys (cpu -> memory -> name -> cpu)
    pub fn next(self) -> Self {
        match self {
            ProcessSort::Cpu => ProcessSort::Memory,
            ProcessSort::Memory => ProcessSort::Name,
            ProcessSort::Name | ProcessSort::Unsorted => ProcessSort::Cpu,
        }
    }
}

impl fmt::Display for ProcessSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessSort {
    type Err = std::convert::Infallible;

    /// Unknown keys fall back to enumeration order instead of failing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "cpu" => ProcessSort::Cpu,
            "memory" | "mem" => ProcessSort::Memory,
            "name" => ProcessSort::Name,
            _ => ProcessSort::Unsorted,
        })
    }
}

fn descending(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Sort by `sort` and keep the first `limit` entries.
///
/// Sorting is stable, so ties keep their enumeration order.
pub fn rank_processes(
    mut processes: Vec<ProcessMetrics>,
    sort: ProcessSort,
    limit: usize,
) -> Vec<ProcessMetrics> {
    match sort {
        ProcessSort::Cpu => processes.sort_by(|a, b| descending(a.cpu_percent, b.cpu_percent)),
        ProcessSort::Memory => {
            processes.sort_by(|a, b| descending(a.memory_percent, b.memory_percent))
        }
        ProcessSort::Name => processes.sort_by_cached_key(|p| p.name.to_lowercase()),
        ProcessSort::Unsorted => {}
    }

    processes.truncate(limit);
    processes
}
