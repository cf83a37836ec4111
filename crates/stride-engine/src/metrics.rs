//! Per-run timing metrics.
//!
//! [`RunReport`] captures wall-clock data for a completed run: one
//! duration per finished step plus the end-to-end total. The scheduler
//! also logs each step's duration at `info` as it completes, so
//! long-running simulations are observable before the report exists.

use std::time::Duration;

/// Timing summary returned by a successful run.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    /// Configured worker thread count.
    pub threads: u32,
    /// Configured total step count.
    pub steps: u64,
    /// Configured substeps per step.
    pub substeps: u32,
    /// Wall-clock duration of each completed step, in step order.
    pub step_durations: Vec<Duration>,
    /// Wall-clock duration of the entire run, including worker
    /// spawn and join.
    pub total: Duration,
}

impl RunReport {
    /// Number of steps that ran to completion.
    pub fn completed_steps(&self) -> u64 {
        self.step_durations.len() as u64
    }

    /// Mean step duration, or `None` for an empty run.
    pub fn mean_step_duration(&self) -> Option<Duration> {
        if self.step_durations.is_empty() {
            return None;
        }
        let total: Duration = self.step_durations.iter().sum();
        Some(total / self.step_durations.len() as u32)
    }
}
