//! Parameter surface
//!
//! Materials expose their editable fields through an immediate-mode widget
//! sink. The sink is external; this module defines the interface plus a
//! recording implementation used by tests and headless tools.

pub mod parameter_surface;
pub mod widget_recorder;

pub use parameter_surface::ParameterSurface;
pub use widget_recorder::{WidgetEdit, WidgetKind, WidgetRecord, WidgetRecorder};
