use std::collections::VecDeque;

use crate::error::{ResmonError, Result};

use super::metrics::MetricSnapshot;

pub const DEFAULT_HISTORY_SIZE: usize = 60;

/// Fixed-capacity FIFO ring buffer backing the rolling charts.
///
/// Appending past capacity evicts the oldest value. Capacity is fixed at
/// construction and must be at least 1.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    capacity: usize,
    values: VecDeque<T>,
}

impl<T: Clone> HistoryBuffer<T> {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ResmonError::InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
        })
    }

    fn with_min_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    pub fn append(&mut self, value: T) {
        if self.values.len() >= self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Copy of the contents, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.values.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Rolling history of the charted scalars (for sparklines and charts)
#[derive(Debug, Clone)]
pub struct MetricsHistory {
    pub cpu: HistoryBuffer<f32>,
    pub memory: HistoryBuffer<f32>,
    /// (sent, received) bytes per second
    pub network: HistoryBuffer<(f64, f64)>,
    /// (read, written) bytes per second
    pub disk_io: HistoryBuffer<(f64, f64)>,
}

impl MetricsHistory {
    pub fn new() -> Self {
        Self::build(DEFAULT_HISTORY_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ResmonError::InvalidCapacity(capacity));
        }
        Ok(Self::build(capacity))
    }

    fn build(capacity: usize) -> Self {
        Self {
            cpu: HistoryBuffer::with_min_capacity(capacity),
            memory: HistoryBuffer::with_min_capacity(capacity),
            network: HistoryBuffer::with_min_capacity(capacity),
            disk_io: HistoryBuffer::with_min_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.cpu.capacity()
    }

    /// Record the charted values of one poll
    pub fn record(&mut self, snapshot: &MetricSnapshot) {
        self.cpu.append(snapshot.cpu.percent);
        self.memory.append(snapshot.memory.percent);
        self.network.append((
            snapshot.network.sent_bytes_per_sec,
            snapshot.network.recv_bytes_per_sec,
        ));
        self.disk_io.append((
            snapshot.disk.read_bytes_per_sec,
            snapshot.disk.write_bytes_per_sec,
        ));
    }

    /// Convert cpu history to u64 for chart widgets
    /// Scales values by 10 to preserve decimal precision (0-1000 range)
    pub fn cpu_as_u64(&self) -> Vec<u64> {
        self.cpu.iter().map(|&v| (v * 10.0) as u64).collect()
    }

    /// Scales values by 10 to preserve decimal precision (0-1000 range)
    pub fn memory_as_u64(&self) -> Vec<u64> {
        self.memory.iter().map(|&v| (v * 10.0) as u64).collect()
    }

    /// Split network history into (upload, download) series in bytes/s
    pub fn network_as_u64(&self) -> (Vec<u64>, Vec<u64>) {
        self.network
            .iter()
            .map(|&(sent, recv)| (sent as u64, recv as u64))
            .unzip()
    }
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::new()
    }
}
