use std::time::Duration;

use crate::config::RelayConfig;

/// Fixed-rate tick accumulator for the authority's simulation domain.
///
/// Wall time goes in, whole fixed steps come out. After a stall, at most
/// `max_catch_up_steps` are returned and the rest of the backlog is dropped.
#[derive(Clone, Debug)]
pub struct FixedTicker {
    step: Duration,
    max_catch_up_steps: u32,
    accumulated: Duration,
}

impl FixedTicker {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            step: config.fixed_dt(),
            max_catch_up_steps: config.max_catch_up_steps.max(1),
            accumulated: Duration::ZERO,
        }
    }

    /// Fixed step length.
    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn step_seconds(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Adds `elapsed` and returns how many fixed steps are due.
    pub fn accumulate(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;

        let mut due = 0;
        while self.accumulated >= self.step && due < self.max_catch_up_steps {
            self.accumulated -= self.step;
            due += 1;
        }

        if self.accumulated >= self.step {
            log::warn!(
                "simulation fell behind; dropping {:?} of backlog",
                self.accumulated
            );
            self.accumulated = Duration::ZERO;
        }

        due
    }

    /// Time carried over toward the next step.
    pub fn remainder(&self) -> Duration {
        self.accumulated
    }
}
