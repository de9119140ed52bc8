//! Fields and uniform upload shared by every technique

use std::sync::Arc;

use crate::assets::{ShaderCache, TextureCache};
use crate::foundation::math::{Mat4, Vec4};
use crate::render::api::{ShaderProgram, Texture, UniformValue};
use crate::render::FrameContext;

use super::MaterialKind;

/// Uniform names of the base block, which differ slightly between shader families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseUniformNames {
    /// Camera eye position (Vec3)
    pub camera_position: &'static str,
    /// Base texture sampler
    pub texture: &'static str,
    /// Texture unit the base texture is bound to
    pub texture_unit: u32,
}

/// Names shared by every program: view-projection, model, time, color
pub(crate) mod names {
    pub const VIEW_PROJECTION: &str = "u_viewprojection";
    pub const MODEL: &str = "u_model";
    pub const TIME: &str = "u_time";
    pub const COLOR: &str = "u_color";
}

/// State common to all techniques
///
/// Program and texture handles are shared with the caches that created
/// them; dropping a material releases nothing on the GPU.
#[derive(Debug, Clone)]
pub struct MaterialBase {
    /// Technique family tag
    pub kind: MaterialKind,
    /// Shading program, `None` when it could not be obtained
    pub program: Option<Arc<dyn ShaderProgram>>,
    /// Base texture (the density volume for volumetric materials)
    pub texture: Option<Arc<dyn Texture>>,
    /// Linear RGBA color, [0, 1] by convention
    pub color: Vec4,
}

impl MaterialBase {
    /// Standard-family base with a white color
    pub fn new(program: Option<Arc<dyn ShaderProgram>>, texture: Option<Arc<dyn Texture>>) -> Self {
        Self {
            kind: MaterialKind::Standard,
            program,
            texture,
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    /// Upload camera, model, time, color and (if present) the base texture
    pub fn upload_common(
        &self,
        program: &dyn ShaderProgram,
        frame: &FrameContext<'_>,
        model: &Mat4,
        names: &BaseUniformNames,
    ) {
        program.set_uniform(
            names::VIEW_PROJECTION,
            UniformValue::Mat4(frame.camera.view_projection_matrix()),
        );
        program.set_uniform(names.camera_position, UniformValue::Vec3(frame.camera.eye()));
        program.set_uniform(names::MODEL, UniformValue::Mat4(*model));
        program.set_uniform(names::TIME, UniformValue::Float(frame.time));
        program.set_uniform(names::COLOR, UniformValue::Vec4(self.color));

        if let Some(texture) = &self.texture {
            program.set_uniform(
                names.texture,
                UniformValue::Texture {
                    texture: Arc::clone(texture),
                    unit: names.texture_unit,
                },
            );
        }
    }
}

/// Ask the cache for a program, logging and returning `None` on failure
pub(crate) fn request_program(
    shaders: &ShaderCache,
    vertex_path: &str,
    fragment_path: &str,
) -> Option<Arc<dyn ShaderProgram>> {
    match shaders.get(vertex_path, fragment_path) {
        Ok(program) => Some(program),
        Err(err) => {
            log::warn!("Material created without a program: {err}");
            None
        }
    }
}

/// Ask the cache for a texture, logging and returning `None` on failure
pub(crate) fn request_texture(textures: &TextureCache, path: &str) -> Option<Arc<dyn Texture>> {
    match textures.get(path) {
        Ok(texture) => Some(texture),
        Err(err) => {
            log::warn!("Material created without texture {path}: {err}");
            None
        }
    }
}
