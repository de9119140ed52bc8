//! Shader program cache
//!
//! Content-addressed by the (vertex, fragment) path pair. Failed compilations
//! are not cached so a fixed shader can be picked up by a later request.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::AssetError;
use crate::render::api::ShaderProgram;

/// Backend service that compiles and links programs
pub trait ShaderCompiler {
    /// Compile the program built from the two stage sources
    fn compile(
        &self,
        vertex_path: &str,
        fragment_path: &str,
    ) -> Result<Arc<dyn ShaderProgram>, AssetError>;
}

type ProgramKey = (String, String);

/// Create-on-first-request cache of shading programs
pub struct ShaderCache {
    compiler: Box<dyn ShaderCompiler>,
    programs: RwLock<HashMap<ProgramKey, Arc<dyn ShaderProgram>>>,
}

impl ShaderCache {
    /// Create an empty cache backed by `compiler`
    pub fn new(compiler: impl ShaderCompiler + 'static) -> Self {
        Self {
            compiler: Box::new(compiler),
            programs: RwLock::new(HashMap::new()),
        }
    }

    /// Get the program for a path pair, compiling it on first request
    pub fn get(
        &self,
        vertex_path: &str,
        fragment_path: &str,
    ) -> Result<Arc<dyn ShaderProgram>, AssetError> {
        let key = (vertex_path.to_string(), fragment_path.to_string());

        if let Some(program) = self
            .programs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(program));
        }

        log::debug!("Shader cache miss, compiling {} + {}", vertex_path, fragment_path);
        let program = self.compiler.compile(vertex_path, fragment_path)?;

        let mut programs = self.programs.write().unwrap_or_else(PoisonError::into_inner);
        let cached = programs.entry(key).or_insert(program);
        Ok(Arc::clone(cached))
    }

    /// Check if a program is cached
    pub fn is_cached(&self, vertex_path: &str, fragment_path: &str) -> bool {
        let key = (vertex_path.to_string(), fragment_path.to_string());
        self.programs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&key)
    }

    /// Get the number of cached programs
    pub fn len(&self) -> usize {
        self.programs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached program
    pub fn clear(&self) {
        self.programs.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
