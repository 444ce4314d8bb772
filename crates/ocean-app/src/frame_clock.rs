//! Variable-step frame clock.
//!
//! Every frame advances the scene by the measured wall time: one update with
//! that `dt`, then one render. Long stalls (window drags, breakpoints) are
//! clamped so the waves and the fly camera don't leap forward.

use std::time::Instant;
use tracing::warn;

/// Longest step a single frame may take, in seconds.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Measures frame time and drives one update + one render per tick.
pub struct FrameClock {
    previous_time: Instant,
    start_time: Instant,
    elapsed: f64,
    last_dt: f64,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            previous_time: now,
            start_time: now,
            elapsed: 0.0,
            last_dt: 0.0,
            frame_count: 0,
        }
    }

    /// Runs one frame.
    ///
    /// - `update_fn(dt, elapsed)` is called exactly once, where `elapsed` is the
    ///   simulated time including this step.
    /// - `render_fn()` is called exactly once, after the update.
    pub fn tick(&mut self, update_fn: impl FnOnce(f64, f64), render_fn: impl FnOnce()) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.step(frame_time, update_fn, render_fn);
    }

    fn step(&mut self, frame_time: f64, update_fn: impl FnOnce(f64, f64), render_fn: impl FnOnce()) {
        let mut dt = frame_time.max(0.0);
        if dt > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                dt * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            dt = MAX_FRAME_TIME;
        }

        self.elapsed += dt;
        self.last_dt = dt;
        update_fn(dt, self.elapsed);
        render_fn();
        self.frame_count += 1;
    }

    /// Step used by the most recent frame, after clamping.
    pub fn last_dt(&self) -> f64 {
        self.last_dt
    }

    /// Simulated time in seconds; runs slower than wall time after clamped frames.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Wall time since the clock was created.
    pub fn uptime(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
