//! Shading programs, textures and geometry as seen by materials

use std::fmt;
use std::sync::Arc;

use crate::foundation::math::{Mat4, Vec3, Vec4};

/// Primitive assembly mode for a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    /// Independent triangles
    Triangles,
    /// Independent line segments
    Lines,
    /// Individual points
    Points,
}

/// Dimensionality of a texture resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// 1-D lookup table stored as a 2-D image
    Lookup,
    /// Ordinary 2-D image
    Texture2D,
    /// 3-D volume
    Texture3D,
}

/// A texture owned by the texture cache
///
/// Materials hold shared handles and only ever bind them through
/// [`UniformValue::Texture`].
pub trait Texture: fmt::Debug {
    /// Path the texture was loaded from
    fn path(&self) -> &str;

    /// Texture dimensionality
    fn kind(&self) -> TextureKind {
        TextureKind::Texture2D
    }
}

/// Payload of a single uniform upload
#[derive(Debug, Clone)]
pub enum UniformValue {
    /// Scalar float
    Float(f32),
    /// Boolean flag
    Bool(bool),
    /// 3-component vector
    Vec3(Vec3),
    /// 4-component vector
    Vec4(Vec4),
    /// 4x4 matrix
    Mat4(Mat4),
    /// Texture bound to a texture unit
    Texture {
        /// Texture to bind
        texture: Arc<dyn Texture>,
        /// Texture unit index
        unit: u32,
    },
}

impl UniformValue {
    /// Whether this upload binds a texture
    pub fn is_texture(&self) -> bool {
        matches!(self, Self::Texture { .. })
    }
}

impl PartialEq for UniformValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Vec3(a), Self::Vec3(b)) => a == b,
            (Self::Vec4(a), Self::Vec4(b)) => a == b,
            (Self::Mat4(a), Self::Mat4(b)) => a == b,
            (
                Self::Texture { texture: a, unit: ua },
                Self::Texture { texture: b, unit: ub },
            ) => ua == ub && Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec3> for UniformValue {
    fn from(value: Vec3) -> Self {
        Self::Vec3(value)
    }
}

impl From<Vec4> for UniformValue {
    fn from(value: Vec4) -> Self {
        Self::Vec4(value)
    }
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        Self::Mat4(value)
    }
}

/// A compiled, linked shading program owned by the shader cache
///
/// Uniform names are part of each technique's fixed contract; there is no
/// reflection. `set_uniform` is only valid between `enable` and `disable`.
pub trait ShaderProgram: fmt::Debug {
    /// Bind the program for subsequent draws
    fn enable(&self);

    /// Unbind the program
    fn disable(&self);

    /// Upload one named uniform to the bound program
    fn set_uniform(&self, name: &str, value: UniformValue);
}

/// Geometry that can issue a single draw call
pub trait Geometry: fmt::Debug {
    /// Draw the whole buffer with the given topology
    fn draw(&self, topology: PrimitiveTopology);
}
