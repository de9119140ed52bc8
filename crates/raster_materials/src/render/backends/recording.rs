//! Headless recording backend
//!
//! Every handle created from one [`Recorder`] shares a single state block, so
//! a draw call can note which program was bound and which raster toggles were
//! active at the moment it was issued.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::assets::{AssetError, ShaderCompiler, TextureLoader};
use crate::render::api::{
    CullMode, Geometry, PolygonMode, PrimitiveTopology, RasterDevice, ShaderProgram, Texture,
    TextureKind, UniformValue,
};
use crate::render::raster_state::RasterState;

/// One recorded device command
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCommand {
    /// A program was bound
    EnableProgram(String),
    /// A program was unbound
    DisableProgram(String),
    /// A uniform was uploaded to a program
    SetUniform {
        /// Program label
        program: String,
        /// Uniform name
        name: String,
        /// Uploaded value
        value: UniformValue,
    },
    /// Depth test toggled
    SetDepthTest(bool),
    /// Cull mode changed
    SetCullMode(CullMode),
    /// Polygon mode changed
    SetPolygonMode(PolygonMode),
    /// A draw call was issued
    Draw(DrawCall),
}

/// A recorded draw call with the state it ran under
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Mesh label
    pub mesh: String,
    /// Requested topology
    pub topology: PrimitiveTopology,
    /// Program bound at draw time, if any
    pub program: Option<String>,
    /// Raster toggles at draw time
    pub raster: RasterState,
}

#[derive(Debug, Default)]
struct RecorderState {
    commands: Vec<GpuCommand>,
    raster: RasterState,
    bound_program: Option<String>,
    uniforms: HashMap<String, HashMap<String, UniformValue>>,
    failing_paths: HashSet<String>,
    compile_count: usize,
    load_count: usize,
}

/// Factory and inspector for recording handles
#[derive(Debug, Clone)]
pub struct Recorder {
    state: Arc<Mutex<RecorderState>>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder {
    /// Create a recorder whose device starts like a fresh context
    /// (depth test off, no culling, filled polygons)
    pub fn new() -> Self {
        let state = RecorderState {
            raster: RasterState {
                depth_test: false,
                ..RasterState::FORWARD
            },
            ..RecorderState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RecorderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Raster device sharing this recorder's state
    pub fn device(&self) -> RecordingDevice {
        RecordingDevice { recorder: self.clone() }
    }

    /// Program handle with the given label
    pub fn program(&self, label: impl Into<String>) -> Arc<RecordingProgram> {
        Arc::new(RecordingProgram {
            label: label.into(),
            recorder: self.clone(),
        })
    }

    /// Texture handle with the given path
    pub fn texture(&self, path: impl Into<String>, kind: TextureKind) -> Arc<RecordingTexture> {
        Arc::new(RecordingTexture {
            path: path.into(),
            kind,
        })
    }

    /// Mesh handle with the given label
    pub fn mesh(&self, label: impl Into<String>) -> RecordingMesh {
        RecordingMesh {
            label: label.into(),
            recorder: self.clone(),
        }
    }

    /// Shader compiler producing recording programs labelled `"vertex|fragment"`
    pub fn compiler(&self) -> RecordingCompiler {
        RecordingCompiler { recorder: self.clone() }
    }

    /// Texture loader producing recording textures
    pub fn texture_loader(&self) -> RecordingTextureLoader {
        RecordingTextureLoader { recorder: self.clone() }
    }

    /// Make compiling or loading `path` fail from now on
    pub fn fail_on(&self, path: impl Into<String>) {
        self.lock().failing_paths.insert(path.into());
    }

    /// All commands recorded so far
    pub fn commands(&self) -> Vec<GpuCommand> {
        self.lock().commands.clone()
    }

    /// Recorded draw calls
    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.lock()
            .commands
            .iter()
            .filter_map(|command| match command {
                GpuCommand::Draw(draw) => Some(draw.clone()),
                _ => None,
            })
            .collect()
    }

    /// Recorded uniform uploads as `(name, value)` pairs, in order
    pub fn uniform_uploads(&self) -> Vec<(String, UniformValue)> {
        self.lock()
            .commands
            .iter()
            .filter_map(|command| match command {
                GpuCommand::SetUniform { name, value, .. } => Some((name.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }

    /// Current uniform values held by a program
    pub fn uniform_state(&self, program: &str) -> HashMap<String, UniformValue> {
        self.lock().uniforms.get(program).cloned().unwrap_or_default()
    }

    /// Current raster toggles
    pub fn raster_state(&self) -> RasterState {
        self.lock().raster
    }

    /// Program currently bound, if any
    pub fn bound_program(&self) -> Option<String> {
        self.lock().bound_program.clone()
    }

    /// Number of programs compiled through [`Recorder::compiler`]
    pub fn compile_count(&self) -> usize {
        self.lock().compile_count
    }

    /// Number of textures loaded through [`Recorder::texture_loader`]
    pub fn load_count(&self) -> usize {
        self.lock().load_count
    }

    /// Forget recorded commands, keeping device and uniform state
    pub fn clear_commands(&self) {
        self.lock().commands.clear();
    }
}

/// Recording raster device
#[derive(Debug, Clone)]
pub struct RecordingDevice {
    recorder: Recorder,
}

impl RasterDevice for RecordingDevice {
    fn depth_test(&self) -> bool {
        self.recorder.lock().raster.depth_test
    }

    fn set_depth_test(&mut self, enabled: bool) {
        let mut state = self.recorder.lock();
        state.raster.depth_test = enabled;
        state.commands.push(GpuCommand::SetDepthTest(enabled));
    }

    fn cull_mode(&self) -> CullMode {
        self.recorder.lock().raster.cull_mode
    }

    fn set_cull_mode(&mut self, mode: CullMode) {
        let mut state = self.recorder.lock();
        state.raster.cull_mode = mode;
        state.commands.push(GpuCommand::SetCullMode(mode));
    }

    fn polygon_mode(&self) -> PolygonMode {
        self.recorder.lock().raster.polygon_mode
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) {
        let mut state = self.recorder.lock();
        state.raster.polygon_mode = mode;
        state.commands.push(GpuCommand::SetPolygonMode(mode));
    }
}

/// Recording shading program
#[derive(Debug)]
pub struct RecordingProgram {
    label: String,
    recorder: Recorder,
}

impl RecordingProgram {
    /// Program label
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl ShaderProgram for RecordingProgram {
    fn enable(&self) {
        let mut state = self.recorder.lock();
        state.bound_program = Some(self.label.clone());
        state.commands.push(GpuCommand::EnableProgram(self.label.clone()));
    }

    fn disable(&self) {
        let mut state = self.recorder.lock();
        if state.bound_program.as_deref() == Some(self.label.as_str()) {
            state.bound_program = None;
        }
        state.commands.push(GpuCommand::DisableProgram(self.label.clone()));
    }

    fn set_uniform(&self, name: &str, value: UniformValue) {
        let mut state = self.recorder.lock();
        if state.bound_program.as_deref() != Some(self.label.as_str()) {
            log::warn!("Uniform {} uploaded to unbound program {}", name, self.label);
        }
        state
            .uniforms
            .entry(self.label.clone())
            .or_default()
            .insert(name.to_string(), value.clone());
        state.commands.push(GpuCommand::SetUniform {
            program: self.label.clone(),
            name: name.to_string(),
            value,
        });
    }
}

/// Recording texture
#[derive(Debug)]
pub struct RecordingTexture {
    path: String,
    kind: TextureKind,
}

impl Texture for RecordingTexture {
    fn path(&self) -> &str {
        &self.path
    }

    fn kind(&self) -> TextureKind {
        self.kind
    }
}

/// Recording mesh
#[derive(Debug, Clone)]
pub struct RecordingMesh {
    label: String,
    recorder: Recorder,
}

impl Geometry for RecordingMesh {
    fn draw(&self, topology: PrimitiveTopology) {
        let mut state = self.recorder.lock();
        log::trace!("RecordingMesh: draw {} as {:?}", self.label, topology);
        let draw = DrawCall {
            mesh: self.label.clone(),
            topology,
            program: state.bound_program.clone(),
            raster: state.raster,
        };
        state.commands.push(GpuCommand::Draw(draw));
    }
}

/// Shader compiler backed by a [`Recorder`]
#[derive(Debug, Clone)]
pub struct RecordingCompiler {
    recorder: Recorder,
}

impl ShaderCompiler for RecordingCompiler {
    fn compile(
        &self,
        vertex_path: &str,
        fragment_path: &str,
    ) -> Result<Arc<dyn ShaderProgram>, AssetError> {
        {
            let mut state = self.recorder.lock();
            for path in [vertex_path, fragment_path] {
                if state.failing_paths.contains(path) {
                    return Err(AssetError::ShaderCompilation {
                        vertex: vertex_path.to_string(),
                        fragment: fragment_path.to_string(),
                        reason: format!("{path} rejected by recorder"),
                    });
                }
            }
            state.compile_count += 1;
        }
        log::trace!("RecordingCompiler: compiling {} + {}", vertex_path, fragment_path);
        Ok(self.recorder.program(format!("{vertex_path}|{fragment_path}")))
    }
}

/// Texture loader backed by a [`Recorder`]
#[derive(Debug, Clone)]
pub struct RecordingTextureLoader {
    recorder: Recorder,
}

impl TextureLoader for RecordingTextureLoader {
    fn load(&self, path: &str) -> Result<Arc<dyn Texture>, AssetError> {
        {
            let mut state = self.recorder.lock();
            if state.failing_paths.contains(path) {
                return Err(AssetError::TextureLoad {
                    path: path.to_string(),
                    reason: "rejected by recorder".to_string(),
                });
            }
            state.load_count += 1;
        }
        log::trace!("RecordingTextureLoader: loading {}", path);
        let kind = if path.ends_with(".vol") || path.ends_with(".pvm") {
            TextureKind::Texture3D
        } else {
            TextureKind::Texture2D
        };
        Ok(self.recorder.texture(path, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_captures_bound_program_and_state() {
        let recorder = Recorder::new();
        let mut device = recorder.device();
        let program = recorder.program("flat");
        let mesh = recorder.mesh("cube");

        device.set_polygon_mode(PolygonMode::Line);
        program.enable();
        mesh.draw(PrimitiveTopology::Triangles);
        program.disable();

        let draws = recorder.draw_calls();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].program.as_deref(), Some("flat"));
        assert_eq!(draws[0].raster.polygon_mode, PolygonMode::Line);
        assert_eq!(recorder.bound_program(), None);
    }

    #[test]
    fn test_uniform_state_keeps_last_value() {
        let recorder = Recorder::new();
        let program = recorder.program("p");
        program.enable();
        program.set_uniform("u_time", UniformValue::Float(1.0));
        program.set_uniform("u_time", UniformValue::Float(2.0));

        assert_eq!(recorder.uniform_uploads().len(), 2);
        assert_eq!(recorder.uniform_state("p")["u_time"], UniformValue::Float(2.0));
    }

    #[test]
    fn test_failing_paths() {
        let recorder = Recorder::new();
        recorder.fail_on("broken.fs");

        assert!(recorder.compiler().compile("a.vs", "broken.fs").is_err());
        assert!(recorder.compiler().compile("a.vs", "fine.fs").is_ok());
        assert!(recorder.texture_loader().load("broken.fs").is_err());
        assert_eq!(recorder.compile_count(), 1);
        assert_eq!(recorder.load_count(), 0);
    }
}
