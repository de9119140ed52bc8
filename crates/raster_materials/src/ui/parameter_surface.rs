//! Immediate-mode widget registration interface

use crate::config::SliderRange;

/// Immediate-mode widget sink populated by `render_in_menu`
///
/// Each call registers one widget bound directly to a material field; the
/// surface may edit the field in place. Nothing is returned to the caller.
pub trait ParameterSurface {
    /// Boolean checkbox
    fn checkbox(&mut self, label: &str, value: &mut bool);

    /// Float slider clamped to `range`
    fn slider(&mut self, label: &str, value: &mut f32, range: SliderRange);

    /// RGB color editor over the first three components of `rgb`
    fn color_edit3(&mut self, label: &str, rgb: &mut [f32]);

    /// Free drag editor over the first three components of `values`
    fn drag_float3(&mut self, label: &str, values: &mut [f32]);
}
