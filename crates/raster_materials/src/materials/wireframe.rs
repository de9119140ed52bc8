//! Wireframe technique: flat uniforms, line fill mode during the draw

use std::sync::Arc;

use crate::assets::ShaderCache;
use crate::config::ShaderPaths;
use crate::foundation::math::{Mat4, Vec4};
use crate::render::api::{Geometry, PolygonMode, PrimitiveTopology, RasterDevice, ShaderProgram};
use crate::render::raster_state::ScopedRasterState;
use crate::render::FrameContext;
use crate::ui::ParameterSurface;

use super::base::MaterialBase;
use super::{render_forward, FlatMaterial, Technique};

/// Flat material drawn as triangle outlines
#[derive(Debug, Clone)]
pub struct WireframeMaterial {
    flat: FlatMaterial,
}

impl WireframeMaterial {
    /// Wireframe material using the untextured flat program
    pub fn new(shaders: &ShaderCache, paths: &ShaderPaths) -> Self {
        Self {
            flat: FlatMaterial::new(shaders, paths),
        }
    }

    /// Assemble from an already obtained program
    pub fn from_parts(program: Option<Arc<dyn ShaderProgram>>) -> Self {
        Self {
            flat: FlatMaterial::from_parts(program, None),
        }
    }

    /// Builder-style color override
    #[must_use]
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.flat.set_color(color);
        self
    }
}

impl Technique for WireframeMaterial {
    fn base(&self) -> &MaterialBase {
        self.flat.base()
    }

    fn base_mut(&mut self) -> &mut MaterialBase {
        self.flat.base_mut()
    }

    fn set_uniforms(&self, frame: &FrameContext<'_>, model: &Mat4) {
        self.flat.set_uniforms(frame, model);
    }

    fn render(
        &self,
        device: &mut dyn RasterDevice,
        mesh: Option<&dyn Geometry>,
        model: &Mat4,
        frame: &FrameContext<'_>,
    ) {
        render_forward(self, device, mesh, model, frame, |device, mesh| {
            let mut scope = ScopedRasterState::new(device);
            scope.set_polygon_mode(PolygonMode::Line);
            mesh.draw(PrimitiveTopology::Triangles);
        });
    }

    fn render_in_menu(&mut self, surface: &mut dyn ParameterSurface) {
        self.flat.render_in_menu(surface);
    }
}
