//! Frame clock
//!
//! The global per-frame clock read by materials when they upload `u_time`.
//! It only ever moves forward.

use std::time::Instant;

/// Monotonic frame clock
///
/// Advanced once per frame, either from wall time ([`FrameClock::tick`]) or
/// by an explicit step ([`FrameClock::advance`]) for fixed-step and headless
/// runs.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Instant,
    delta_time: f64,
    elapsed: f64,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            elapsed: 0.0,
            frame_count: 0,
        }
    }

    /// Advance by the wall time since the previous tick
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        self.advance(delta)
    }

    /// Advance by a fixed step in seconds
    ///
    /// Negative or non-finite steps are treated as zero so the clock stays
    /// monotonic.
    pub fn advance(&mut self, seconds: f64) -> f64 {
        let delta = if seconds.is_finite() && seconds > 0.0 { seconds } else { 0.0 };
        self.delta_time = delta;
        self.elapsed += delta;
        self.frame_count += 1;
        delta
    }

    /// Seconds since the previous frame
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Total elapsed seconds, as uploaded to shaders
    #[allow(clippy::cast_possible_truncation)]
    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    /// Number of frames stepped so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
