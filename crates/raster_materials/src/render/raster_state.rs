//! Scoped fixed-function state
//!
//! [`RasterState`] is a snapshot of the three global raster toggles.
//! [`ScopedRasterState`] changes some of them for the duration of a scope and
//! puts back exactly what it changed when dropped, so a technique that needs
//! an unusual mode (wireframe) cannot leak it into the next draw.

use bitflags::bitflags;

use super::api::{CullMode, PolygonMode, RasterDevice};

bitflags! {
    /// Selects which raster toggles an operation touches
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RasterFlags: u8 {
        /// Depth test enable
        const DEPTH_TEST = 1 << 0;
        /// Face culling mode
        const CULL_MODE = 1 << 1;
        /// Polygon fill mode
        const POLYGON_MODE = 1 << 2;
    }
}

/// Snapshot of the global raster toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterState {
    /// Depth test enabled
    pub depth_test: bool,
    /// Face culling mode
    pub cull_mode: CullMode,
    /// Polygon fill mode
    pub polygon_mode: PolygonMode,
}

impl Default for RasterState {
    fn default() -> Self {
        Self::FORWARD
    }
}

impl RasterState {
    /// State every technique asserts on entry and leaves behind:
    /// depth test on, culling off, filled polygons.
    pub const FORWARD: Self = Self {
        depth_test: true,
        cull_mode: CullMode::None,
        polygon_mode: PolygonMode::Fill,
    };

    /// Read the current state from a device
    pub fn capture(device: &dyn RasterDevice) -> Self {
        Self {
            depth_test: device.depth_test(),
            cull_mode: device.cull_mode(),
            polygon_mode: device.polygon_mode(),
        }
    }

    /// Write the selected toggles to a device
    ///
    /// Values are written unconditionally, never diffed against the device.
    pub fn apply(&self, device: &mut dyn RasterDevice, flags: RasterFlags) {
        if flags.contains(RasterFlags::DEPTH_TEST) {
            device.set_depth_test(self.depth_test);
        }
        if flags.contains(RasterFlags::CULL_MODE) {
            device.set_cull_mode(self.cull_mode);
        }
        if flags.contains(RasterFlags::POLYGON_MODE) {
            device.set_polygon_mode(self.polygon_mode);
        }
    }
}

/// Guard that restores the raster toggles it changed when dropped
///
/// Only toggles set through the guard are restored; the rest of the device
/// state is left as the scope found or made it.
pub struct ScopedRasterState<'a> {
    device: &'a mut dyn RasterDevice,
    saved: RasterState,
    touched: RasterFlags,
}

impl<'a> ScopedRasterState<'a> {
    /// Capture the device state and open a scope
    pub fn new(device: &'a mut dyn RasterDevice) -> Self {
        let saved = RasterState::capture(device);
        Self {
            device,
            saved,
            touched: RasterFlags::empty(),
        }
    }

    /// State observed when the scope was opened
    pub fn saved(&self) -> RasterState {
        self.saved
    }

    /// Toggles that will be restored on drop
    pub fn touched(&self) -> RasterFlags {
        self.touched
    }

    /// Enable or disable depth testing for this scope
    pub fn set_depth_test(&mut self, enabled: bool) {
        self.touched |= RasterFlags::DEPTH_TEST;
        self.device.set_depth_test(enabled);
    }

    /// Set the face culling mode for this scope
    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.touched |= RasterFlags::CULL_MODE;
        self.device.set_cull_mode(mode);
    }

    /// Set the polygon fill mode for this scope
    pub fn set_polygon_mode(&mut self, mode: PolygonMode) {
        self.touched |= RasterFlags::POLYGON_MODE;
        self.device.set_polygon_mode(mode);
    }
}

impl Drop for ScopedRasterState<'_> {
    fn drop(&mut self) {
        self.saved.apply(self.device, self.touched);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::recording::Recorder;

    #[test]
    fn test_scope_restores_only_touched_flags() {
        let recorder = Recorder::new();
        let mut device = recorder.device();
        device.set_depth_test(false);

        {
            let mut scope = ScopedRasterState::new(&mut device);
            scope.set_polygon_mode(PolygonMode::Line);
            scope.set_cull_mode(CullMode::Back);
            assert_eq!(scope.touched(), RasterFlags::POLYGON_MODE | RasterFlags::CULL_MODE);
        }

        let state = RasterState::capture(&device);
        assert_eq!(state.polygon_mode, PolygonMode::Fill);
        assert_eq!(state.cull_mode, CullMode::None);
        assert!(!state.depth_test);
    }

    #[test]
    fn test_scope_restores_non_default_prior_state() {
        let recorder = Recorder::new();
        let mut device = recorder.device();
        device.set_polygon_mode(PolygonMode::Point);

        {
            let mut scope = ScopedRasterState::new(&mut device);
            scope.set_polygon_mode(PolygonMode::Line);
        }

        assert_eq!(device.polygon_mode(), PolygonMode::Point);
    }

    #[test]
    fn test_apply_writes_selected_flags() {
        let recorder = Recorder::new();
        let mut device = recorder.device();
        device.set_depth_test(false);
        device.set_cull_mode(CullMode::Front);
        device.set_polygon_mode(PolygonMode::Line);

        RasterState::FORWARD.apply(&mut device, RasterFlags::DEPTH_TEST | RasterFlags::CULL_MODE);

        assert!(device.depth_test());
        assert_eq!(device.cull_mode(), CullMode::None);
        assert_eq!(device.polygon_mode(), PolygonMode::Line);
    }
}
