//! Per-frame inputs shared by every draw in a frame

use crate::foundation::time::FrameClock;

use super::primitives::Camera;

/// Camera and clock reading for the frame being rendered
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Active camera
    pub camera: &'a Camera,
    /// Elapsed seconds, uploaded as `u_time`
    pub time: f32,
}

impl<'a> FrameContext<'a> {
    /// Build a context from a camera and an explicit time
    pub fn new(camera: &'a Camera, time: f32) -> Self {
        Self { camera, time }
    }

    /// Build a context reading the frame clock
    pub fn from_clock(camera: &'a Camera, clock: &FrameClock) -> Self {
        Self::new(camera, clock.elapsed())
    }
}
