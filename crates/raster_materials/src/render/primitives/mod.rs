//! Core rendering primitives

pub mod camera;

pub use camera::Camera;
