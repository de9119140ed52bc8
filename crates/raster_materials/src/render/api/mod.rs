//! Backend abstraction traits for the material system
//!
//! Materials never talk to a graphics API directly. They see compiled
//! programs, textures, geometry and the fixed-function raster device through
//! the traits in this module; a backend provides the implementations.

pub mod gpu;
pub mod raster;

pub use gpu::{Geometry, PrimitiveTopology, ShaderProgram, Texture, TextureKind, UniformValue};
pub use raster::{CullMode, PolygonMode, RasterDevice};
