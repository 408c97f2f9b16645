//! Run configuration shared by the interpreter and the batch evaluator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing and step limits for running machines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Auto-run interval between steps, in milliseconds.
    pub step_delay_ms: u64,

    /// Step cap for accept/reject evaluation.
    pub accept_step_cap: usize,

    /// Step cap for transform evaluation.
    pub transform_step_cap: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 800,
            accept_step_cap: 200,
            transform_step_cap: 400,
        }
    }
}

impl RunConfig {
    /// No auto-run delay and small caps, for tests.
    pub fn fast() -> Self {
        Self {
            step_delay_ms: 0,
            accept_step_cap: 50,
            transform_step_cap: 100,
        }
    }

    /// Auto-run interval.
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}
