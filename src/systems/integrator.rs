//! Fixed-step accumulator.
//!
//! Converts variable frame deltas into a whole number of constant physics
//! steps, so a session covers the same simulated time at 30 or 144 FPS.

use crate::domain::config::StepperConfig;

#[derive(Clone, Debug)]
pub struct FixedStepper {
    step_size: f64,
    max_sub_steps: u32,
    max_frame_delta: f64,
    accumulator: f64,
}

impl FixedStepper {
    pub fn new(config: &StepperConfig) -> Self {
        Self {
            step_size: config.step_size as f64,
            max_sub_steps: config.max_sub_steps.max(1),
            max_frame_delta: config.max_frame_delta as f64,
            accumulator: 0.0,
        }
    }

    #[inline]
    pub fn step_size(&self) -> f32 {
        self.step_size as f32
    }

    /// Unconsumed time in seconds.
    #[inline]
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Add one frame's elapsed seconds and return how many fixed steps to run.
    ///
    /// Negative or non-finite deltas count as zero. When the per-frame cap is
    /// hit the leftover backlog is dropped instead of being replayed later.
    pub fn accumulate(&mut self, elapsed: f32) -> u32 {
        let elapsed = if elapsed.is_finite() { elapsed as f64 } else { 0.0 };
        self.accumulator += elapsed.clamp(0.0, self.max_frame_delta);

        let mut steps = 0;
        while self.accumulator >= self.step_size && steps < self.max_sub_steps {
            self.accumulator -= self.step_size;
            steps += 1;
        }
        if steps == self.max_sub_steps && self.accumulator >= self.step_size {
            self.accumulator %= self.step_size;
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
