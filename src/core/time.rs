//! Frame clock
//!
//! An explicit clock value owned by whoever runs the frame loop.

use std::time::{Duration, Instant};

/// Frame deltas above this many seconds are reported as zero
pub const MAX_FRAME_SECONDS: f32 = 0.2;

/// Measures time between frames
#[derive(Debug, Clone)]
pub struct Clock {
    /// Instant of the previous tick
    last: Instant,
    /// Raw duration of the last frame
    delta: Duration,
    /// Time accumulated over all ticks
    elapsed: Duration,
    /// Ticks since creation or reset
    frames: u64,
}

impl Clock {
    /// Create a clock starting now
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frames: 0,
        }
    }

    /// Restart the clock from now
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Mark the end of a frame and return its length in seconds
    ///
    /// Frames longer than [`MAX_FRAME_SECONDS`] (a stall, a breakpoint, a
    /// window drag) return 0 so the simulation does not jump.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last);
        self.last = now;
        self.tick_with(delta)
    }

    /// Advance by a fixed duration instead of wall time
    pub fn tick_with(&mut self, delta: Duration) -> f32 {
        self.delta = delta;
        self.elapsed += delta;
        self.frames += 1;

        let seconds = delta.as_secs_f32();
        if seconds > MAX_FRAME_SECONDS {
            log::debug!("Frame took {seconds:.3}s, dropping delta");
            return 0.0;
        }
        seconds
    }

    /// Frames per second, from the last frame
    #[must_use]
    pub fn fps(&self) -> f32 {
        let seconds = self.delta.as_secs_f32();
        if seconds > 0.0 { 1.0 / seconds } else { 0.0 }
    }

    /// Raw duration of the last frame
    #[must_use]
    pub const fn delta(&self) -> Duration {
        self.delta
    }

    /// Total time over all ticks
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frames
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
