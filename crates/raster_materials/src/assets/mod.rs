//! Shared GPU asset caches
//!
//! Programs and textures are created on first request and shared afterwards.
//! The caches own them; materials only hold `Arc` handles and never release
//! anything themselves.

pub mod shader_cache;
pub mod texture_cache;

pub use shader_cache::{ShaderCache, ShaderCompiler};
pub use texture_cache::{TextureCache, TextureLoader};

/// Errors raised while creating shared assets
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// A program failed to compile or link
    #[error("Shader compilation failed for {vertex} + {fragment}: {reason}")]
    ShaderCompilation {
        /// Vertex stage path
        vertex: String,
        /// Fragment stage path
        fragment: String,
        /// Backend message
        reason: String,
    },

    /// A texture failed to load
    #[error("Texture load failed for {path}: {reason}")]
    TextureLoad {
        /// Texture path
        path: String,
        /// Backend message
        reason: String,
    },
}
