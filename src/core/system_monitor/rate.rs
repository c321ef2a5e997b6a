//! Rate derivation from cumulative OS counters.
//!
//! Network and disk I/O are reported by the OS as monotonically growing
//! byte totals. A rate is the delta between two readings divided by the
//! wall-clock time between them, clamped so that a counter reset or a
//! zero-length interval never yields a negative, infinite or NaN value.

use std::time::Instant;

/// Bytes (or any unit) per second between two cumulative readings.
///
/// Returns 0 when `elapsed_secs` is not strictly positive (including NaN)
/// or when `current < previous` (counter reset or wraparound).
pub fn rate_per_sec(previous: u64, current: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs.is_nan() || elapsed_secs <= 0.0 || current < previous {
        return 0.0;
    }
    (current - previous) as f64 / elapsed_secs
}

/// Two consecutive readings of one counter stream.
#[derive(Debug, Clone, Copy)]
pub struct CounterPair {
    pub previous: u64,
    pub current: u64,
    pub timestamp_prev: Instant,
    pub timestamp_cur: Instant,
}

impl CounterPair {
    pub fn elapsed_secs(&self) -> f64 {
        self.timestamp_cur
            .checked_duration_since(self.timestamp_prev)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }

    pub fn rate(&self) -> f64 {
        rate_per_sec(self.previous, self.current, self.elapsed_secs())
    }
}

/// Tracks one counter stream across polls.
///
/// The reading passed to [`RateSampler::sample`] becomes the baseline for
/// the next call.
#[derive(Debug, Clone, Default)]
pub struct RateSampler {
    last: Option<(u64, Instant)>,
}

impl RateSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a baseline without producing a rate.
    pub fn prime(&mut self, current: u64, now: Instant) {
        self.last = Some((current, now));
    }

    /// Feed the next cumulative reading and get the rate since the previous one.
    ///
    /// The first reading on an unprimed sampler yields 0.
    pub fn sample(&mut self, current: u64, now: Instant) -> f64 {
        let rate = match self.last {
            Some((previous, timestamp_prev)) => CounterPair {
                previous,
                current,
                timestamp_prev,
                timestamp_cur: now,
            }
            .rate(),
            None => 0.0,
        };
        self.last = Some((current, now));
        rate
    }

    pub fn last_reading(&self) -> Option<u64> {
        self.last.map(|(value, _)| value)
    }
}
