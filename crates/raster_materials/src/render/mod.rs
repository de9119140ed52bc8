//! # Rendering surface
//!
//! Backend-facing half of the material system.
//!
//! ## Architecture
//!
//! - **API traits**: programs, textures, geometry and the raster device
//! - **Raster state**: fixed-function toggles and the scoped guard that
//!   restores them
//! - **Camera / frame context**: per-frame inputs every material reads
//! - **Backends**: the headless recording backend
//!
//! Materials only ever see the traits in [`api`]. A real graphics backend
//! implements them outside this crate.

// Public modules for application use
pub mod api;
pub mod raster_state;

// Core primitives
pub mod frame;
pub mod primitives;

/// Graphics backend implementations
pub mod backends;

pub use frame::FrameContext;
pub use primitives::Camera;
pub use raster_state::{RasterFlags, RasterState, ScopedRasterState};
