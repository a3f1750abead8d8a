//! Step observers
//!
//! The integrator reports each completed step to a [`StepObserver`]. Progress
//! display, trajectory sampling and the like live here, never in the loop.

use log::info;

use super::NetworkState;

/// Called once after every completed integration step.
///
/// `step` counts from 1. The state is the post-update snapshot and is
/// read-only.
pub trait StepObserver {
    fn on_step(&mut self, step: u64, state: &NetworkState);
}

impl<F> StepObserver for F
where
    F: FnMut(u64, &NetworkState),
{
    fn on_step(&mut self, step: u64, state: &NetworkState) {
        self(step, state)
    }
}

/// Observer that ignores every step
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    fn on_step(&mut self, _step: u64, _state: &NetworkState) {}
}

/// Logs a progress line every `every` steps and at the final step
#[derive(Clone, Debug)]
pub struct ProgressLog {
    every: u64,
    total: u64,
}

impl ProgressLog {
    /// `every = 0` only logs the final step
    pub fn new(every: u64, total: u64) -> Self {
        Self { every, total }
    }

    fn due(&self, step: u64) -> bool {
        step == self.total || (self.every > 0 && step % self.every == 0)
    }
}

impl StepObserver for ProgressLog {
    fn on_step(&mut self, step: u64, state: &NetworkState) {
        if !self.due(step) {
            return;
        }
        let peak = state.x.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        info!("step {}/{}: max |x| = {:.4}", step, self.total, peak);
    }
}
