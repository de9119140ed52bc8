//! Math utilities and types
//!
//! Provides the fundamental math types shared by cameras, transforms and
//! uniform payloads.

pub use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a pure non-uniform scale matrix (no translation or rotation)
    fn from_scale(scale: &Vec3) -> Mat4;

    /// Create an OpenGL-style perspective projection (clip depth in [-1, 1])
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Extract the per-axis scale encoded in the upper 3x3 block
    fn scale_factors(&self) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn from_scale(scale: &Vec3) -> Mat4 {
        Mat4::new_nonuniform_scaling(scale)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        nalgebra::Perspective3::new(aspect, fov_y, near, far).to_homogeneous()
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }

    fn scale_factors(&self) -> Vec3 {
        Vec3::new(
            Vec3::new(self.m11, self.m21, self.m31).magnitude(),
            Vec3::new(self.m12, self.m22, self.m32).magnitude(),
            Vec3::new(self.m13, self.m23, self.m33).magnitude(),
        )
    }
}
