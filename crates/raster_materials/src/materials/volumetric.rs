//! Ray-marched volume technique
//!
//! The density volume lives in the base texture slot and is bound on unit 0;
//! an optional transfer-function lookup is bound on unit 1. Every parameter
//! is uploaded each frame whether or not its feature toggle is on, so the
//! shader always sees a complete uniform block.
//!
//! With auto-scale on, [`Technique::update`] overwrites the bound drawable's
//! transform with a pure scale preset chosen by slice mode. The binding is an
//! explicit [`DrawableId`]; a material with no binding, or whose drawable has
//! been removed, leaves every transform alone.

use std::sync::Arc;

use crate::assets::{ShaderCache, TextureCache};
use crate::config::{AutoScalePresets, MaterialConfig, MenuRanges};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec4};
use crate::render::api::{ShaderProgram, Texture, UniformValue};
use crate::render::FrameContext;
use crate::scene::{DrawableId, TransformRegistry};
use crate::ui::ParameterSurface;

use super::base::{request_program, request_texture, BaseUniformNames, MaterialBase};
use super::Technique;

/// Uniform names used by the ray-marching vertex stage
pub const VOLUME_UNIFORMS: BaseUniformNames = BaseUniformNames {
    camera_position: "u_camera_pos",
    texture: "u_vol_texture",
    texture_unit: 0,
};

/// Texture unit of the transfer-function lookup
pub const TRANSFER_FUNCTION_UNIT: u32 = 1;

/// Volumetric material with its ray-march parameter block
#[derive(Debug, Clone)]
pub struct VolumetricMaterial {
    base: MaterialBase,
    /// Transfer-function lookup texture
    pub transfer_function: Option<Arc<dyn Texture>>,
    /// Slice position, used while slice mode is on
    pub slice: f32,
    /// Brightness multiplier
    pub brightness: f32,
    /// Ray-march step factor
    pub step_factor: f32,
    /// Opacity threshold
    pub threshold: f32,
    /// Render a single slab instead of the whole volume
    pub slice_mode: bool,
    /// Jitter ray start positions
    pub jittering: bool,
    /// Map density through the transfer function
    pub transfer_function_enabled: bool,
    /// Apply direct lighting
    pub lighting: bool,
    /// Drive the bound drawable's transform from slice mode
    pub auto_scale: bool,
    /// Discard samples beyond the clip plane
    pub clipping: bool,
    /// Clip plane as (normal.xyz, offset)
    pub clip_plane: Vec4,
    /// World-space light position
    pub light_position: Vec3,
    /// Light color
    pub light_color: Vec3,
    target: Option<DrawableId>,
    presets: AutoScalePresets,
    ranges: MenuRanges,
}

impl VolumetricMaterial {
    /// Volumetric material using the configured ray-marching program and
    /// transfer-function texture
    ///
    /// `density` is the 3-D texture produced by the asset service, if any.
    /// `target` is the drawable whose transform auto-scale may overwrite.
    pub fn new(
        shaders: &ShaderCache,
        textures: &TextureCache,
        config: &MaterialConfig,
        density: Option<Arc<dyn Texture>>,
        target: Option<DrawableId>,
    ) -> Self {
        let program = request_program(
            shaders,
            &config.shaders.volume_vertex,
            &config.shaders.volume_fragment,
        );
        let transfer_function =
            request_texture(textures, &config.volume.transfer_function_texture);
        Self::from_parts(program, density, transfer_function, config, target)
    }

    /// Assemble from already obtained handles, taking parameters from `config`
    pub fn from_parts(
        program: Option<Arc<dyn ShaderProgram>>,
        density: Option<Arc<dyn Texture>>,
        transfer_function: Option<Arc<dyn Texture>>,
        config: &MaterialConfig,
        target: Option<DrawableId>,
    ) -> Self {
        let defaults = &config.volume;
        Self {
            base: MaterialBase::new(program, density),
            transfer_function,
            slice: defaults.slice,
            brightness: defaults.brightness,
            step_factor: defaults.step_factor,
            threshold: defaults.threshold,
            slice_mode: defaults.slice_mode,
            jittering: defaults.jittering,
            transfer_function_enabled: defaults.transfer_function,
            lighting: defaults.lighting,
            auto_scale: defaults.auto_scale,
            clipping: defaults.clipping,
            clip_plane: defaults.clip_plane,
            light_position: defaults.light_position,
            light_color: defaults.light_color,
            target,
            presets: config.auto_scale,
            ranges: config.menu,
        }
    }

    /// Density volume, if any
    pub fn density(&self) -> Option<&Arc<dyn Texture>> {
        self.base.texture.as_ref()
    }

    /// Drawable this material auto-scales
    pub fn target(&self) -> Option<DrawableId> {
        self.target
    }

    /// Bind auto-scale to a drawable
    pub fn bind_to(&mut self, target: DrawableId) {
        self.target = Some(target);
    }

    /// Scale auto-scale would apply right now
    pub fn auto_scale_preset(&self) -> Vec3 {
        self.presets.for_slice_mode(self.slice_mode)
    }
}

impl Technique for VolumetricMaterial {
    fn base(&self) -> &MaterialBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut MaterialBase {
        &mut self.base
    }

    fn set_uniforms(&self, frame: &FrameContext<'_>, model: &Mat4) {
        let Some(program) = &self.base.program else {
            return;
        };
        let program = program.as_ref();

        self.base.upload_common(program, frame, model, &VOLUME_UNIFORMS);

        program.set_uniform("u_slider", UniformValue::Float(self.slice));
        program.set_uniform("u_slider_bool", UniformValue::Bool(self.slice_mode));
        program.set_uniform("u_brightness", UniformValue::Float(self.brightness));

        if let Some(lookup) = &self.transfer_function {
            program.set_uniform(
                "u_tf",
                UniformValue::Texture {
                    texture: Arc::clone(lookup),
                    unit: TRANSFER_FUNCTION_UNIT,
                },
            );
        }

        program.set_uniform("u_jittering", UniformValue::Bool(self.jittering));
        program.set_uniform("u_factor", UniformValue::Float(self.step_factor));
        program.set_uniform("u_tf_bool", UniformValue::Bool(self.transfer_function_enabled));
        program.set_uniform("u_clip", UniformValue::Vec4(self.clip_plane));
        program.set_uniform("u_vol_clip", UniformValue::Bool(self.clipping));
        program.set_uniform("u_light_pos", UniformValue::Vec3(self.light_position));
        program.set_uniform("u_light_color", UniformValue::Vec3(self.light_color));
        program.set_uniform("u_lighting", UniformValue::Bool(self.lighting));
        program.set_uniform("u_threshold", UniformValue::Float(self.threshold));
    }

    fn render_in_menu(&mut self, surface: &mut dyn ParameterSurface) {
        surface.checkbox("Auto scale", &mut self.auto_scale);
        surface.color_edit3("Color", self.base.color.as_mut_slice());
        surface.checkbox("Slider", &mut self.slice_mode);
        surface.checkbox("Jittering", &mut self.jittering);
        surface.checkbox("Transfer function", &mut self.transfer_function_enabled);
        surface.checkbox("Use clipping plane", &mut self.clipping);
        if self.slice_mode {
            surface.slider("Slice", &mut self.slice, self.ranges.slice);
        }
        surface.slider("Brightness", &mut self.brightness, self.ranges.brightness);
        surface.slider("Step factor", &mut self.step_factor, self.ranges.step_factor);
        surface.slider("Threshold", &mut self.threshold, self.ranges.threshold);
        surface.checkbox("Direct Light", &mut self.lighting);
        if self.lighting {
            surface.drag_float3("Light Position", self.light_position.as_mut_slice());
            surface.color_edit3("Light Color", self.light_color.as_mut_slice());
        }
    }

    fn update(&mut self, _seconds_elapsed: f64, transforms: &mut TransformRegistry) {
        if !self.auto_scale {
            return;
        }
        let Some(target) = self.target else {
            return;
        };

        let scale = self.auto_scale_preset();
        if !transforms.set(target, Mat4::from_scale(&scale)) {
            log::debug!("Auto-scale target {target:?} no longer exists");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::api::{PrimitiveTopology, TextureKind};
    use crate::render::backends::Recorder;
    use crate::render::primitives::Camera;
    use crate::ui::{WidgetEdit, WidgetKind, WidgetRecorder};
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    fn volume(recorder: &Recorder, target: Option<DrawableId>) -> VolumetricMaterial {
        VolumetricMaterial::from_parts(
            Some(recorder.program("volume")),
            Some(recorder.texture("data/volumes/foot.vol", TextureKind::Texture3D)),
            Some(recorder.texture("data/textures/tf_lut.png", TextureKind::Lookup)),
            &MaterialConfig::default(),
            target,
        )
    }

    fn upload(material: &VolumetricMaterial) {
        let camera = Camera::default();
        if let Some(program) = material.program() {
            program.enable();
        }
        material.set_uniforms(&FrameContext::new(&camera, 0.0), &Mat4::identity());
    }

    #[test]
    fn test_defaults() {
        let recorder = Recorder::new();
        let material = volume(&recorder, None);

        assert_relative_eq!(material.slice, 0.5);
        assert_relative_eq!(material.brightness, 10.0);
        assert_relative_eq!(material.step_factor, 100.0);
        assert_relative_eq!(material.threshold, 0.2);
        assert!(!material.slice_mode);
        assert!(material.jittering);
        assert!(!material.transfer_function_enabled);
        assert!(!material.lighting);
        assert!(material.auto_scale);
        assert!(material.clipping);
        assert_eq!(material.clip_plane, Vec4::new(0.0, 8.0, 0.0, -4.0));
        assert_eq!(material.light_position, Vec3::new(50.0, 50.0, 0.0));
        assert_eq!(material.light_color, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_full_uniform_block() {
        let recorder = Recorder::new();
        let material = volume(&recorder, None);

        upload(&material);

        let names: HashSet<String> = recorder
            .uniform_uploads()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        for expected in [
            "u_viewprojection",
            "u_camera_pos",
            "u_model",
            "u_time",
            "u_color",
            "u_vol_texture",
            "u_slider",
            "u_slider_bool",
            "u_brightness",
            "u_tf",
            "u_jittering",
            "u_factor",
            "u_tf_bool",
            "u_clip",
            "u_vol_clip",
            "u_light_pos",
            "u_light_color",
            "u_lighting",
            "u_threshold",
        ] {
            assert!(names.contains(expected), "missing {expected}");
        }
        assert!(!names.contains("u_camera_position"));

        let state = recorder.uniform_state("volume");
        assert!(matches!(state["u_vol_texture"], UniformValue::Texture { unit: 0, .. }));
        assert!(matches!(state["u_tf"], UniformValue::Texture { unit: 1, .. }));
        assert_eq!(state["u_factor"], UniformValue::Float(100.0));
        assert_eq!(state["u_clip"], UniformValue::Vec4(Vec4::new(0.0, 8.0, 0.0, -4.0)));
        assert_eq!(state["u_vol_clip"], UniformValue::Bool(true));
    }

    #[test]
    fn test_clip_plane_and_toggle_keep_their_names() {
        let recorder = Recorder::new();
        let mut material = volume(&recorder, None);
        material.clipping = false;
        material.clip_plane = Vec4::new(1.0, 0.0, 0.0, 2.0);

        upload(&material);

        let state = recorder.uniform_state("volume");
        assert_eq!(state["u_clip"], UniformValue::Vec4(Vec4::new(1.0, 0.0, 0.0, 2.0)));
        assert_eq!(state["u_vol_clip"], UniformValue::Bool(false));
    }

    fn set_toggles(material: &mut VolumetricMaterial, bits: u8) {
        material.slice_mode = bits & 1 != 0;
        material.jittering = bits & 2 != 0;
        material.transfer_function_enabled = bits & 4 != 0;
        material.lighting = bits & 8 != 0;
        material.auto_scale = bits & 16 != 0;
        material.clipping = bits & 32 != 0;
    }

    #[test]
    fn test_missing_textures_skip_their_bindings() {
        for (has_density, has_lookup) in [(false, false), (false, true), (true, false)] {
            for bits in 0..64u8 {
                let recorder = Recorder::new();
                let density = has_density
                    .then(|| recorder.texture("foot.vol", TextureKind::Texture3D) as Arc<dyn Texture>);
                let lookup = has_lookup
                    .then(|| recorder.texture("tf_lut.png", TextureKind::Lookup) as Arc<dyn Texture>);
                let mut material = VolumetricMaterial::from_parts(
                    Some(recorder.program("volume")),
                    density,
                    lookup,
                    &MaterialConfig::default(),
                    None,
                );
                set_toggles(&mut material, bits);

                upload(&material);

                let state = recorder.uniform_state("volume");
                let case = format!("density={has_density} lookup={has_lookup} toggles={bits:06b}");
                assert_eq!(state.contains_key("u_vol_texture"), has_density, "{case}");
                assert_eq!(state.contains_key("u_tf"), has_lookup, "{case}");
                assert!(state.contains_key("u_brightness"), "{case}");
                let bound = state.values().filter(|v| v.is_texture()).count();
                assert_eq!(bound, usize::from(has_density) + usize::from(has_lookup), "{case}");
            }
        }
    }

    #[test]
    fn test_lighting_off_still_uploads_light_values() {
        let recorder = Recorder::new();
        let mut material = volume(&recorder, None);
        material.lighting = false;
        material.light_position = Vec3::new(1.0, 2.0, 3.0);

        upload(&material);

        let state = recorder.uniform_state("volume");
        assert_eq!(state["u_lighting"], UniformValue::Bool(false));
        assert_eq!(state["u_light_pos"], UniformValue::Vec3(Vec3::new(1.0, 2.0, 3.0)));
        assert!(state.contains_key("u_light_color"));
    }

    #[test]
    fn test_render_draws_once() {
        let recorder = Recorder::new();
        let mut device = recorder.device();
        let material = volume(&recorder, None);
        let camera = Camera::default();

        material.render(
            &mut device,
            Some(&recorder.mesh("cube")),
            &Mat4::identity(),
            &FrameContext::new(&camera, 0.0),
        );

        let draws = recorder.draw_calls();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].topology, PrimitiveTopology::Triangles);
        assert_eq!(recorder.bound_program(), None);
    }

    #[test]
    fn test_missing_mesh_or_program_is_a_no_op() {
        let recorder = Recorder::new();
        let mut device = recorder.device();
        let camera = Camera::default();
        let frame = FrameContext::new(&camera, 0.0);
        let before = recorder.raster_state();

        let with_program = volume(&recorder, None);
        with_program.render(&mut device, None, &Mat4::identity(), &frame);

        let without_program = VolumetricMaterial::from_parts(
            None,
            Some(recorder.texture("foot.vol", TextureKind::Texture3D)),
            None,
            &MaterialConfig::default(),
            None,
        );
        without_program.render(
            &mut device,
            Some(&recorder.mesh("cube")),
            &Mat4::identity(),
            &frame,
        );

        assert!(recorder.commands().is_empty());
        assert_eq!(recorder.raster_state(), before);
    }

    #[test]
    fn test_auto_scale_follows_slice_mode() {
        let recorder = Recorder::new();
        let mut transforms = TransformRegistry::new();
        let target = transforms.insert(Mat4::new_translation(&Vec3::new(3.0, 0.0, 0.0)));
        let bystander = transforms.insert(Mat4::new_translation(&Vec3::new(0.0, 7.0, 0.0)));
        let mut material = volume(&recorder, Some(target));

        material.update(0.016, &mut transforms);
        assert_eq!(
            transforms.get(target).copied(),
            Some(Mat4::from_scale(&Vec3::new(5.0, 5.0, 9.0)))
        );

        material.slice_mode = true;
        material.update(0.016, &mut transforms);
        let sliced = transforms.get(target).copied().expect("target transform");
        assert_eq!(sliced, Mat4::from_scale(&Vec3::new(4.0, 4.0, 0.25)));
        assert_relative_eq!(sliced.scale_factors(), Vec3::new(4.0, 4.0, 0.25));

        assert_eq!(
            transforms.get(bystander).copied(),
            Some(Mat4::new_translation(&Vec3::new(0.0, 7.0, 0.0)))
        );
    }

    #[test]
    fn test_auto_scale_off_leaves_transform() {
        let recorder = Recorder::new();
        let mut transforms = TransformRegistry::new();
        let original = Mat4::new_translation(&Vec3::new(1.0, 1.0, 1.0));
        let target = transforms.insert(original);
        let mut material = volume(&recorder, Some(target));
        material.auto_scale = false;

        material.update(0.016, &mut transforms);

        assert_eq!(transforms.get(target).copied(), Some(original));
    }

    #[test]
    fn test_update_without_live_target_is_harmless() {
        let recorder = Recorder::new();
        let mut transforms = TransformRegistry::new();
        let other = transforms.insert(Mat4::identity());
        let stale = transforms.insert(Mat4::identity());
        transforms.remove(stale);

        let mut unbound = volume(&recorder, None);
        unbound.update(0.016, &mut transforms);
        let mut dangling = volume(&recorder, Some(stale));
        dangling.update(0.016, &mut transforms);

        assert_eq!(transforms.len(), 1);
        assert_eq!(transforms.get(other).copied(), Some(Mat4::identity()));
    }

    #[test]
    fn test_menu_layout_follows_toggles() {
        let recorder = Recorder::new();
        let mut material = volume(&recorder, None);
        let mut surface = WidgetRecorder::new();

        material.render_in_menu(&mut surface);
        assert_eq!(
            surface.labels(),
            vec![
                "Auto scale",
                "Color",
                "Slider",
                "Jittering",
                "Transfer function",
                "Use clipping plane",
                "Brightness",
                "Step factor",
                "Threshold",
                "Direct Light",
            ]
        );
        assert_eq!(
            surface.find("Step factor").map(|w| w.kind),
            Some(WidgetKind::Slider(crate::config::SliderRange::new(50.0, 100.0)))
        );

        material.slice_mode = true;
        material.lighting = true;
        surface.begin_frame();
        material.render_in_menu(&mut surface);
        let labels = surface.labels();
        assert_eq!(labels[6], "Slice");
        assert_eq!(&labels[labels.len() - 2..], &["Light Position", "Light Color"]);
        assert_eq!(surface.find("Light Position").map(|w| w.kind), Some(WidgetKind::Drag3));
    }

    #[test]
    fn test_menu_edits_write_back() {
        let recorder = Recorder::new();
        let mut material = volume(&recorder, None);
        let mut surface = WidgetRecorder::new();
        surface.queue_edit("Brightness", WidgetEdit::Float(25.0));
        surface.queue_edit("Direct Light", WidgetEdit::Bool(true));

        material.render_in_menu(&mut surface);

        assert_relative_eq!(material.brightness, 10.0);
        assert!(material.lighting);
        // Lighting turned on mid-pass, so its widgets appear in the same frame
        assert!(surface.find("Light Color").is_some());
    }
}
