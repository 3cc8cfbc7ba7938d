//! Fixed-step clock

use crate::consts::MAX_SUBSTEPS;

/// Longest frame the clock will accept, in seconds
const MAX_FRAME_SECS: f32 = 0.1;

/// Turns variable frame times into whole simulation steps
#[derive(Debug, Clone)]
pub struct FixedClock {
    step: f32,
    accumulator: f32,
    max_substeps: u32,
}

impl FixedClock {
    pub fn new(fps: u32) -> Self {
        Self {
            step: 1.0 / fps.max(1) as f32,
            accumulator: 0.0,
            max_substeps: MAX_SUBSTEPS,
        }
    }

    /// Seconds per step
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add `elapsed` seconds and return how many steps to run now.
    ///
    /// Long stalls are clamped and at most `MAX_SUBSTEPS` steps are handed
    /// out per call, so a slow frame cannot snowball into slower ones.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_SECS);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_substeps && self.accumulator >= self.step {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        steps
    }

    /// Forget any partial step (e.g. after a restart or focus loss)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
