//! Wall-clock measurement around a single kernel call.

use std::time::{Duration, Instant};

/// Monotonic timestamps taken immediately around one kernel call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingRecord {
    pub start: Instant,
    pub end: Instant,
}

impl TimingRecord {
    /// Run `f` with nothing but the two clock reads around it.
    pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Self) {
        let start = Instant::now();
        let out = f();
        let end = Instant::now();
        (out, Self { start, end })
    }

    pub fn elapsed(&self) -> Duration {
        self.end.saturating_duration_since(self.start)
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }
}

/// `reference / candidate` elapsed time.
///
/// `None` when the candidate took no measurable time, which a real run never
/// does; it is not guaranteed by construction.
pub fn performance_ratio(reference: &TimingRecord, candidate: &TimingRecord) -> Option<f64> {
    let candidate = candidate.elapsed();
    if candidate.is_zero() {
        return None;
    }
    Some(reference.elapsed().as_secs_f64() / candidate.as_secs_f64())
}
