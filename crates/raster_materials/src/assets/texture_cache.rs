//! Texture cache keyed by path

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::AssetError;
use crate::render::api::Texture;

/// Backend service that loads textures
pub trait TextureLoader {
    /// Load the texture stored at `path`
    fn load(&self, path: &str) -> Result<Arc<dyn Texture>, AssetError>;
}

/// Create-on-first-request cache of textures
pub struct TextureCache {
    loader: Box<dyn TextureLoader>,
    textures: RwLock<HashMap<String, Arc<dyn Texture>>>,
}

impl TextureCache {
    /// Create an empty cache backed by `loader`
    pub fn new(loader: impl TextureLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            textures: RwLock::new(HashMap::new()),
        }
    }

    /// Get the texture at `path`, loading it on first request
    pub fn get(&self, path: &str) -> Result<Arc<dyn Texture>, AssetError> {
        if let Some(texture) = self
            .textures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
        {
            return Ok(Arc::clone(texture));
        }

        log::debug!("Texture cache miss, loading {}", path);
        let texture = self.loader.load(path)?;

        let mut textures = self.textures.write().unwrap_or_else(PoisonError::into_inner);
        let cached = textures.entry(path.to_string()).or_insert(texture);
        Ok(Arc::clone(cached))
    }

    /// Check if a texture is cached
    pub fn is_cached(&self, path: &str) -> bool {
        self.textures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    /// Get the number of cached textures
    pub fn len(&self) -> usize {
        self.textures.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
