//! # Material Configuration
//!
//! Shader paths, volumetric defaults, auto-scale presets and the ranges the
//! parameter surface exposes. Every value has a default so a partial file is
//! enough to override one setting.

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::foundation::math::{Vec3, Vec4};

/// Top-level configuration for the material subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MaterialConfig {
    /// Shader source paths per technique
    pub shaders: ShaderPaths,
    /// Initial values for new volumetric materials
    pub volume: VolumeDefaults,
    /// Scale presets applied by the volumetric auto-scale rule
    pub auto_scale: AutoScalePresets,
    /// Slider ranges registered on the parameter surface
    pub menu: MenuRanges,
}

impl Config for MaterialConfig {}

impl MaterialConfig {
    /// Check ranges and unit-interval values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = |name: &str, value: f32| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be in [0, 1], got {value}")))
            }
        };
        unit("volume.slice", self.volume.slice)?;
        unit("volume.threshold", self.volume.threshold)?;

        for (name, range) in [
            ("menu.slice", self.menu.slice),
            ("menu.brightness", self.menu.brightness),
            ("menu.step_factor", self.menu.step_factor),
            ("menu.threshold", self.menu.threshold),
        ] {
            if range.min > range.max {
                return Err(ConfigError::Invalid(format!(
                    "{name} has min {} above max {}",
                    range.min, range.max
                )));
            }
        }

        for (name, value) in [
            ("volume.step_factor", self.volume.step_factor),
            ("volume.brightness", self.volume.brightness),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Vertex/fragment source paths, used as shader cache keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderPaths {
    /// Vertex stage shared by the flat and wireframe techniques
    pub basic_vertex: String,
    /// Untextured fragment stage
    pub flat_fragment: String,
    /// Textured fragment stage
    pub texture_fragment: String,
    /// Ray-marching vertex stage
    pub volume_vertex: String,
    /// Ray-marching fragment stage
    pub volume_fragment: String,
}

impl Default for ShaderPaths {
    fn default() -> Self {
        Self {
            basic_vertex: "data/shaders/basic.vs".to_string(),
            flat_fragment: "data/shaders/flat.fs".to_string(),
            texture_fragment: "data/shaders/texture.fs".to_string(),
            volume_vertex: "data/shaders/volume_rendering.vs".to_string(),
            volume_fragment: "data/shaders/volume_rendering.fs".to_string(),
        }
    }
}

/// Initial parameter block of a volumetric material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeDefaults {
    /// Transfer-function lookup texture path
    pub transfer_function_texture: String,
    /// Slice position in [0, 1]
    pub slice: f32,
    /// Brightness multiplier
    pub brightness: f32,
    /// Ray-march step factor
    pub step_factor: f32,
    /// Opacity threshold in [0, 1]
    pub threshold: f32,
    /// Slice mode toggle
    pub slice_mode: bool,
    /// Ray start jitter toggle
    pub jittering: bool,
    /// Transfer-function toggle
    pub transfer_function: bool,
    /// Direct lighting toggle
    pub lighting: bool,
    /// Auto-scale toggle
    pub auto_scale: bool,
    /// Clip-plane toggle
    pub clipping: bool,
    /// Clip plane as (normal.xyz, offset)
    pub clip_plane: Vec4,
    /// Light position in world space
    pub light_position: Vec3,
    /// Light color
    pub light_color: Vec3,
}

impl Default for VolumeDefaults {
    fn default() -> Self {
        Self {
            transfer_function_texture: "data/textures/tf_lut.png".to_string(),
            slice: 0.5,
            brightness: 10.0,
            step_factor: 100.0,
            threshold: 0.2,
            slice_mode: false,
            jittering: true,
            transfer_function: false,
            lighting: false,
            auto_scale: true,
            clipping: true,
            clip_plane: Vec4::new(0.0, 8.0, 0.0, -4.0),
            light_position: Vec3::new(50.0, 50.0, 0.0),
            light_color: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Non-uniform scale presets for the volumetric auto-scale rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoScalePresets {
    /// Flattened preset used while slice mode is on
    pub sliced: Vec3,
    /// Taller preset used otherwise
    pub full: Vec3,
}

impl Default for AutoScalePresets {
    fn default() -> Self {
        Self {
            sliced: Vec3::new(4.0, 4.0, 0.25),
            full: Vec3::new(5.0, 5.0, 9.0),
        }
    }
}

impl AutoScalePresets {
    /// Preset for the given slice-mode state
    pub fn for_slice_mode(&self, slice_mode: bool) -> Vec3 {
        if slice_mode {
            self.sliced
        } else {
            self.full
        }
    }
}

/// Inclusive slider bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
}

impl SliderRange {
    /// Create a new range
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// Slider ranges for the volumetric parameter surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuRanges {
    /// "Slice" slider
    pub slice: SliderRange,
    /// "Brightness" slider
    pub brightness: SliderRange,
    /// "Step factor" slider
    pub step_factor: SliderRange,
    /// "Threshold" slider
    pub threshold: SliderRange,
}

impl Default for MenuRanges {
    fn default() -> Self {
        Self {
            slice: SliderRange::new(0.01, 1.0),
            brightness: SliderRange::new(1.0, 10.0),
            step_factor: SliderRange::new(50.0, 100.0),
            threshold: SliderRange::new(0.0, 1.0),
        }
    }
}
