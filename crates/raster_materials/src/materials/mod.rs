//! # Material techniques
//!
//! A material decides, per drawable, which program runs, which uniforms it
//! receives and which fixed-function toggles are active during the draw.
//!
//! ## Techniques
//!
//! - **Flat**: solid or textured shading, minimal uniform set
//! - **Wireframe**: flat uniforms, drawn with line fill mode
//! - **Volumetric**: ray-marched 3-D texture with transfer function,
//!   lighting, clipping and an auto-scale rule bound to one drawable
//!
//! ## Call sequence
//!
//! The scene calls [`Technique::update`] once per frame and then
//! [`Technique::render`] per drawable. `render` asserts depth test on and
//! culling off, enables the program, uploads uniforms, draws triangles and
//! disables the program. Depth and cull flags are left as asserted; every
//! technique re-asserts them on entry. Anything else a technique changes is
//! restored before `render` returns.

pub mod base;
pub mod flat;
pub mod volumetric;
pub mod wireframe;

pub use base::{BaseUniformNames, MaterialBase};
pub use flat::FlatMaterial;
pub use volumetric::VolumetricMaterial;
pub use wireframe::WireframeMaterial;

use std::sync::Arc;

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::foundation::math::Mat4;
use crate::render::api::{Geometry, PrimitiveTopology, RasterDevice, ShaderProgram};
use crate::render::raster_state::{RasterFlags, RasterState};
use crate::render::FrameContext;
use crate::scene::TransformRegistry;
use crate::ui::ParameterSurface;

/// Raster toggles asserted at the start of every render and left in place
pub const ASSERTED_ON_ENTRY: RasterFlags = RasterFlags::DEPTH_TEST.union(RasterFlags::CULL_MODE);

/// Technique family tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaterialKind {
    /// Flat, wireframe and volumetric techniques
    #[default]
    Standard,
    /// Reserved for a skybox technique
    Skybox,
    /// Reserved for a physically based technique
    Pbr,
}

/// Errors raised while assembling materials from configuration and caches
#[derive(thiserror::Error, Debug)]
pub enum MaterialError {
    /// A program or texture could not be created
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The four-operation contract every technique satisfies
pub trait Technique {
    /// Shared fields
    fn base(&self) -> &MaterialBase;

    /// Shared fields, mutably
    fn base_mut(&mut self) -> &mut MaterialBase;

    /// Technique family tag
    fn kind(&self) -> MaterialKind {
        self.base().kind
    }

    /// Program handle, if one was obtained
    fn program(&self) -> Option<&Arc<dyn ShaderProgram>> {
        self.base().program.as_ref()
    }

    /// Raster state required on entry to `render`
    fn entry_state(&self) -> RasterState {
        RasterState::FORWARD
    }

    /// Upload the full uniform set to this material's program
    ///
    /// The program must already be enabled. Uploading twice with the same
    /// arguments leaves the same uniform state as uploading once.
    fn set_uniforms(&self, frame: &FrameContext<'_>, model: &Mat4);

    /// Draw `mesh` with this technique
    ///
    /// A missing mesh or program makes this a no-op that touches no state.
    fn render(
        &self,
        device: &mut dyn RasterDevice,
        mesh: Option<&dyn Geometry>,
        model: &Mat4,
        frame: &FrameContext<'_>,
    ) {
        render_forward(self, device, mesh, model, frame, |_, mesh| {
            mesh.draw(PrimitiveTopology::Triangles);
        });
    }

    /// Register editable widgets bound to this material's fields
    fn render_in_menu(&mut self, surface: &mut dyn ParameterSurface);

    /// Per-frame step, called before `render`
    ///
    /// May only touch this material and the one drawable it is bound to.
    fn update(&mut self, _seconds_elapsed: f64, _transforms: &mut TransformRegistry) {}
}

/// Shared render skeleton; `draw` issues the draw call and may scope extra state
pub(crate) fn render_forward<T: Technique + ?Sized>(
    technique: &T,
    device: &mut dyn RasterDevice,
    mesh: Option<&dyn Geometry>,
    model: &Mat4,
    frame: &FrameContext<'_>,
    draw: impl FnOnce(&mut dyn RasterDevice, &dyn Geometry),
) {
    let (Some(program), Some(mesh)) = (technique.program(), mesh) else {
        log::trace!("Skipping {:?} draw: missing program or mesh", technique.kind());
        return;
    };

    technique.entry_state().apply(device, ASSERTED_ON_ENTRY);

    program.enable();
    technique.set_uniforms(frame, model);
    draw(device, mesh);
    program.disable();
}

/// Closed set of techniques behind one capability
#[derive(Debug, Clone)]
pub enum Material {
    /// Flat-shaded solid
    Flat(FlatMaterial),
    /// Wireframe overlay
    Wireframe(WireframeMaterial),
    /// Ray-marched volume
    Volumetric(VolumetricMaterial),
}

impl Material {
    /// The active technique
    pub fn technique(&self) -> &dyn Technique {
        match self {
            Self::Flat(m) => m,
            Self::Wireframe(m) => m,
            Self::Volumetric(m) => m,
        }
    }

    /// The active technique, mutably
    pub fn technique_mut(&mut self) -> &mut dyn Technique {
        match self {
            Self::Flat(m) => m,
            Self::Wireframe(m) => m,
            Self::Volumetric(m) => m,
        }
    }

    /// Volumetric parameters, if this is a volumetric material
    pub fn as_volumetric(&self) -> Option<&VolumetricMaterial> {
        match self {
            Self::Volumetric(m) => Some(m),
            _ => None,
        }
    }

    /// Volumetric parameters, mutably
    pub fn as_volumetric_mut(&mut self) -> Option<&mut VolumetricMaterial> {
        match self {
            Self::Volumetric(m) => Some(m),
            _ => None,
        }
    }
}

impl Technique for Material {
    fn base(&self) -> &MaterialBase {
        self.technique().base()
    }

    fn base_mut(&mut self) -> &mut MaterialBase {
        self.technique_mut().base_mut()
    }

    fn entry_state(&self) -> RasterState {
        self.technique().entry_state()
    }

    fn set_uniforms(&self, frame: &FrameContext<'_>, model: &Mat4) {
        self.technique().set_uniforms(frame, model);
    }

    fn render(
        &self,
        device: &mut dyn RasterDevice,
        mesh: Option<&dyn Geometry>,
        model: &Mat4,
        frame: &FrameContext<'_>,
    ) {
        self.technique().render(device, mesh, model, frame);
    }

    fn render_in_menu(&mut self, surface: &mut dyn ParameterSurface) {
        self.technique_mut().render_in_menu(surface);
    }

    fn update(&mut self, seconds_elapsed: f64, transforms: &mut TransformRegistry) {
        self.technique_mut().update(seconds_elapsed, transforms);
    }
}

impl From<FlatMaterial> for Material {
    fn from(material: FlatMaterial) -> Self {
        Self::Flat(material)
    }
}

impl From<WireframeMaterial> for Material {
    fn from(material: WireframeMaterial) -> Self {
        Self::Wireframe(material)
    }
}

impl From<VolumetricMaterial> for Material {
    fn from(material: VolumetricMaterial) -> Self {
        Self::Volumetric(material)
    }
}
