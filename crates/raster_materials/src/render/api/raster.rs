//! Fixed-function raster state
//!
//! Depth test, face culling and polygon fill mode are process-wide toggles.
//! A [`RasterDevice`] exposes them; every material re-asserts the flags it
//! needs at the start of its own render call instead of assuming a clean
//! slate.

/// Polygon rasterization mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolygonMode {
    /// Filled polygons
    #[default]
    Fill,
    /// Polygon edges only
    Line,
    /// Polygon vertices only
    Point,
}

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// Culling disabled
    #[default]
    None,
    /// Cull back faces
    Back,
    /// Cull front faces
    Front,
}

/// Global fixed-function state of the rasterizer
pub trait RasterDevice {
    /// Whether depth testing is enabled
    fn depth_test(&self) -> bool;

    /// Enable or disable depth testing
    fn set_depth_test(&mut self, enabled: bool);

    /// Current face culling mode
    fn cull_mode(&self) -> CullMode;

    /// Set the face culling mode
    fn set_cull_mode(&mut self, mode: CullMode);

    /// Current polygon fill mode (front and back faces)
    fn polygon_mode(&self) -> PolygonMode;

    /// Set the polygon fill mode for front and back faces
    fn set_polygon_mode(&mut self, mode: PolygonMode);
}
