//! Run metrics
//!
//! Timing and throughput for one completed run. The call total is
//! derived from the run shape, not counted: a worker that errors its
//! way through still attempted its full share, and keeping the
//! denominator fixed keeps runs comparable.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RunMetrics {
    pub workers: usize,
    pub calls_per_worker: usize,
    pub total_calls: u64,
    pub elapsed: Duration,
}

impl RunMetrics {
    pub fn new(workers: usize, calls_per_worker: usize, elapsed: Duration) -> RunMetrics {
        RunMetrics {
            workers,
            calls_per_worker,
            total_calls: workers as u64 * calls_per_worker as u64,
            elapsed,
        }
    }

    /// Calls per second over the whole run, at nanosecond resolution.
    pub fn qps(&self) -> f64 {
        (self.total_calls as f64 * 1_000_000_000.0) / self.elapsed.as_nanos() as f64
    }

    /// Writes the run summary to stdout.
    pub fn print_summary(&self) {
        println!(
            "workers: {}, calls: {}, workers * calls: {}",
            self.workers, self.calls_per_worker, self.total_calls
        );
        println!("total time: {} us", self.elapsed.as_micros());
        println!("qps: {:.6}", self.qps());
    }
}
