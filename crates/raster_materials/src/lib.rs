//! # Raster Materials
//!
//! Material subsystem for a forward rasterizer: how each drawable is shaded,
//! which uniforms its program receives and which fixed-function toggles are
//! active while it draws.
//!
//! ## Features
//!
//! - **Three techniques**: flat, wireframe and ray-marched volumetric
//! - **Shared assets**: programs and textures cached and shared by handle
//! - **Scoped raster state**: temporary toggles restored on scope exit
//! - **Parameter surface**: materials expose their fields to an external UI
//! - **File-backed defaults**: TOML or RON configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use raster_materials::prelude::*;
//!
//! let recorder = Recorder::new();
//! let shaders = ShaderCache::new(recorder.compiler());
//! let config = MaterialConfig::default();
//!
//! let mut scene = Scene::new();
//! let mesh: Arc<dyn Geometry> = Arc::new(recorder.mesh("cube"));
//! scene.spawn("cube", Mat4::identity(), Some(mesh), |_| {
//!     FlatMaterial::new(&shaders, &config.shaders).into()
//! });
//!
//! let camera = Camera::default();
//! let mut device = recorder.device();
//! scene.update(0.016);
//! scene.render(&mut device, &FrameContext::new(&camera, 0.0));
//!
//! assert_eq!(recorder.draw_calls().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod render;
pub mod materials;
pub mod scene;
pub mod ui;

/// Common imports for crate users
pub mod prelude {
    pub use std::sync::Arc;

    pub use crate::{
        assets::{AssetError, ShaderCache, ShaderCompiler, TextureCache, TextureLoader},
        config::{Config, ConfigError, MaterialConfig},
        foundation::{
            math::{Mat4, Mat4Ext, Vec3, Vec4},
            time::FrameClock,
        },
        materials::{
            FlatMaterial, Material, MaterialError, MaterialKind, Technique, VolumetricMaterial,
            WireframeMaterial,
        },
        render::{
            api::{Geometry, RasterDevice, ShaderProgram, Texture, TextureKind},
            backends::Recorder,
            Camera, FrameContext,
        },
        scene::{DrawableId, Scene, TransformRegistry},
        ui::{ParameterSurface, WidgetRecorder},
    };
}
