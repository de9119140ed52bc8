//! Flat-shaded technique

use std::sync::Arc;

use crate::assets::{ShaderCache, TextureCache};
use crate::config::ShaderPaths;
use crate::foundation::math::{Mat4, Vec4};
use crate::render::api::{ShaderProgram, Texture};
use crate::render::FrameContext;
use crate::ui::ParameterSurface;

use super::base::{request_program, request_texture, BaseUniformNames, MaterialBase};
use super::Technique;

/// Uniform names used by the basic vertex stage
pub const FLAT_UNIFORMS: BaseUniformNames = BaseUniformNames {
    camera_position: "u_camera_position",
    texture: "u_texture",
    texture_unit: 0,
};

/// Solid or textured surface with the minimal uniform set
#[derive(Debug, Clone)]
pub struct FlatMaterial {
    base: MaterialBase,
}

impl FlatMaterial {
    /// Untextured flat material using the basic vertex and flat fragment stages
    pub fn new(shaders: &ShaderCache, paths: &ShaderPaths) -> Self {
        let program = request_program(shaders, &paths.basic_vertex, &paths.flat_fragment);
        Self::from_parts(program, None)
    }

    /// Textured flat material sampling `texture_path` on unit 0
    pub fn textured(
        shaders: &ShaderCache,
        textures: &TextureCache,
        paths: &ShaderPaths,
        texture_path: &str,
    ) -> Self {
        let program = request_program(shaders, &paths.basic_vertex, &paths.texture_fragment);
        let texture = request_texture(textures, texture_path);
        Self::from_parts(program, texture)
    }

    /// Assemble from already obtained handles
    pub fn from_parts(
        program: Option<Arc<dyn ShaderProgram>>,
        texture: Option<Arc<dyn Texture>>,
    ) -> Self {
        Self {
            base: MaterialBase::new(program, texture),
        }
    }

    /// Builder-style color override
    #[must_use]
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.base.color = color;
        self
    }

    /// Current color
    pub fn color(&self) -> Vec4 {
        self.base.color
    }

    /// Replace the color
    pub fn set_color(&mut self, color: Vec4) {
        self.base.color = color;
    }

    /// Base texture, if any
    pub fn texture(&self) -> Option<&Arc<dyn Texture>> {
        self.base.texture.as_ref()
    }
}

impl Technique for FlatMaterial {
    fn base(&self) -> &MaterialBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut MaterialBase {
        &mut self.base
    }

    fn set_uniforms(&self, frame: &FrameContext<'_>, model: &Mat4) {
        if let Some(program) = &self.base.program {
            self.base
                .upload_common(program.as_ref(), frame, model, &FLAT_UNIFORMS);
        }
    }

    fn render_in_menu(&mut self, surface: &mut dyn ParameterSurface) {
        surface.color_edit3("Color", self.base.color.as_mut_slice());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::api::{
        CullMode, Geometry, PolygonMode, PrimitiveTopology, RasterDevice, TextureKind,
        UniformValue,
    };
    use crate::render::backends::{GpuCommand, Recorder};
    use crate::render::primitives::Camera;
    use crate::ui::WidgetRecorder;
    use std::collections::HashSet;

    fn uniform_names(recorder: &Recorder) -> HashSet<String> {
        recorder
            .uniform_uploads()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    #[test]
    fn test_render_uploads_exact_uniform_set() {
        let recorder = Recorder::new();
        let mut device = recorder.device();
        let material = FlatMaterial::from_parts(Some(recorder.program("flat")), None);
        let mesh = recorder.mesh("cube");
        let camera = Camera::default();
        let frame = FrameContext::new(&camera, 2.5);

        material.render(&mut device, Some(&mesh), &Mat4::identity(), &frame);

        let expected: HashSet<String> = [
            "u_viewprojection",
            "u_camera_position",
            "u_model",
            "u_time",
            "u_color",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(uniform_names(&recorder), expected);

        let state = recorder.uniform_state("flat");
        assert_eq!(state["u_time"], UniformValue::Float(2.5));
        assert_eq!(state["u_camera_position"], UniformValue::Vec3(camera.eye()));
        assert_eq!(
            state["u_viewprojection"],
            UniformValue::Mat4(camera.view_projection_matrix())
        );
    }

    #[test]
    fn test_render_draws_triangles_once_under_forward_state() {
        let recorder = Recorder::new();
        let mut device = recorder.device();
        device.set_cull_mode(CullMode::Back);
        let material = FlatMaterial::from_parts(Some(recorder.program("flat")), None);
        let mesh = recorder.mesh("cube");
        let camera = Camera::default();

        material.render(&mut device, Some(&mesh), &Mat4::identity(), &FrameContext::new(&camera, 0.0));

        let draws = recorder.draw_calls();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].topology, PrimitiveTopology::Triangles);
        assert_eq!(draws[0].program.as_deref(), Some("flat"));
        assert!(draws[0].raster.depth_test);
        assert_eq!(draws[0].raster.cull_mode, CullMode::None);
        assert_eq!(draws[0].raster.polygon_mode, PolygonMode::Fill);

        // Program is unbound afterwards, asserted toggles persist
        assert_eq!(recorder.bound_program(), None);
        assert!(device.depth_test());
        assert_eq!(device.cull_mode(), CullMode::None);
    }

    #[test]
    fn test_missing_mesh_or_program_is_a_no_op() {
        let recorder = Recorder::new();
        let mut device = recorder.device();
        let camera = Camera::default();
        let frame = FrameContext::new(&camera, 0.0);
        let mesh = recorder.mesh("cube");
        let before = recorder.raster_state();

        let with_program = FlatMaterial::from_parts(Some(recorder.program("flat")), None);
        with_program.render(&mut device, None, &Mat4::identity(), &frame);

        let without_program = FlatMaterial::from_parts(None, None);
        without_program.render(&mut device, Some(&mesh as &dyn Geometry), &Mat4::identity(), &frame);

        assert!(recorder.commands().is_empty());
        assert_eq!(recorder.raster_state(), before);
    }

    #[test]
    fn test_texture_bound_on_unit_zero_only_when_present() {
        let recorder = Recorder::new();
        let program = recorder.program("textured");
        let texture = recorder.texture("data/textures/crate.png", TextureKind::Texture2D);
        let material = FlatMaterial::from_parts(Some(program.clone()), Some(texture));
        let camera = Camera::default();

        program.enable();
        material.set_uniforms(&FrameContext::new(&camera, 0.0), &Mat4::identity());

        match &recorder.uniform_state("textured")["u_texture"] {
            UniformValue::Texture { texture, unit } => {
                assert_eq!(*unit, 0);
                assert_eq!(texture.path(), "data/textures/crate.png");
            }
            other => panic!("expected texture binding, got {other:?}"),
        }

        recorder.clear_commands();
        let untextured = FlatMaterial::from_parts(Some(program), None);
        untextured.set_uniforms(&FrameContext::new(&camera, 0.0), &Mat4::identity());
        assert!(!uniform_names(&recorder).contains("u_texture"));
    }

    #[test]
    fn test_set_uniforms_is_idempotent() {
        let recorder = Recorder::new();
        let program = recorder.program("flat");
        let material = FlatMaterial::from_parts(Some(program.clone()), None)
            .with_color(Vec4::new(0.2, 0.4, 0.6, 1.0));
        let camera = Camera::default();
        let frame = FrameContext::new(&camera, 1.0);
        let model = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));

        program.enable();
        material.set_uniforms(&frame, &model);
        let once = recorder.uniform_state("flat");
        material.set_uniforms(&frame, &model);

        assert_eq!(recorder.uniform_state("flat"), once);
        assert_eq!(once["u_model"], UniformValue::Mat4(model));
    }

    #[test]
    fn test_constructors_request_programs_through_cache() {
        let recorder = Recorder::new();
        let shaders = ShaderCache::new(recorder.compiler());
        let textures = TextureCache::new(recorder.texture_loader());
        let paths = ShaderPaths::default();

        let flat = FlatMaterial::new(&shaders, &paths);
        let again = FlatMaterial::new(&shaders, &paths);
        let textured = FlatMaterial::textured(&shaders, &textures, &paths, "data/textures/a.png");

        assert!(Arc::ptr_eq(
            flat.program().expect("program"),
            again.program().expect("program")
        ));
        assert_eq!(recorder.compile_count(), 2);
        assert!(textured.texture().is_some());
    }

    #[test]
    fn test_failed_program_request_yields_inert_material() {
        let recorder = Recorder::new();
        recorder.fail_on("data/shaders/flat.fs");
        let shaders = ShaderCache::new(recorder.compiler());

        let material = FlatMaterial::new(&shaders, &ShaderPaths::default());
        assert!(material.program().is_none());

        let mut device = recorder.device();
        let camera = Camera::default();
        material.render(
            &mut device,
            Some(&recorder.mesh("cube")),
            &Mat4::identity(),
            &FrameContext::new(&camera, 0.0),
        );
        assert!(recorder
            .commands()
            .iter()
            .all(|c| !matches!(c, GpuCommand::Draw(_))));
    }

    #[test]
    fn test_menu_exposes_color() {
        let mut material = FlatMaterial::from_parts(None, None);
        let mut surface = WidgetRecorder::new();

        material.render_in_menu(&mut surface);

        assert_eq!(surface.labels(), vec!["Color"]);
    }
}
