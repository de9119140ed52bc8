//! Graphics backend implementations
//!
//! Only a headless recording backend ships with the crate. It implements every
//! collaborator trait and keeps a log of what a real device would have been
//! asked to do, which is what the tests and the viewer inspect.

pub mod recording;

pub use recording::{
    DrawCall, GpuCommand, Recorder, RecordingCompiler, RecordingDevice, RecordingMesh,
    RecordingProgram, RecordingTexture, RecordingTextureLoader,
};
