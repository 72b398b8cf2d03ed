//! Frame timing for the window update loop
//!
//! [`FrameClock`] turns irregular wall-clock frames into fixed update steps,
//! so close animations advance by the same amounts regardless of frame rate.

use std::time::Instant;

/// Upper bound on catch-up steps per frame
const MAX_STEPS_PER_FRAME: u32 = 8;

/// Fixed-step frame clock
#[derive(Debug, Clone)]
pub struct FrameClock {
    step: f32,
    accumulator: f32,
    last_frame: Instant,
    total_steps: u64,
}

impl FrameClock {
    /// Clock producing steps of `step` seconds
    pub fn new(step: f32) -> Self {
        Self {
            step: step.max(f32::EPSILON),
            accumulator: 0.0,
            last_frame: Instant::now(),
            total_steps: 0,
        }
    }

    /// Length of one step in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Steps handed out so far
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Sample the wall clock and return the number of steps that are due
    pub fn tick(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed)
    }

    /// Feed `elapsed` seconds and return the number of steps that are due
    ///
    /// Long stalls are clamped to [`MAX_STEPS_PER_FRAME`] steps; the excess is
    /// dropped.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME {
            log::trace!("Frame clock dropped {:.3}s of backlog", self.accumulator);
            self.accumulator = 0.0;
        }

        self.total_steps += u64::from(steps);
        steps
    }
}
