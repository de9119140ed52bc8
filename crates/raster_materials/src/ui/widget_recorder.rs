//! Recording parameter surface with scripted edits

use std::collections::HashMap;

use super::ParameterSurface;
use crate::config::SliderRange;

/// Kind of widget registered on the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetKind {
    /// Checkbox
    Checkbox,
    /// Slider with its range
    Slider(SliderRange),
    /// RGB color editor
    Color,
    /// Three-component drag editor
    Drag3,
}

/// One registered widget
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetRecord {
    /// Widget label
    pub label: String,
    /// Widget kind
    pub kind: WidgetKind,
}

/// Edit applied to a widget's bound field on its next registration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetEdit {
    /// Set a checkbox
    Bool(bool),
    /// Set a slider; the value is clamped to the slider range
    Float(f32),
    /// Set three components of a color or drag editor
    Float3([f32; 3]),
}

/// Parameter surface that records registrations and applies queued edits
///
/// Stands in for an interactive UI: queue an edit for a label, let the
/// material register its widgets, and the edit lands in the bound field.
#[derive(Debug, Default)]
pub struct WidgetRecorder {
    widgets: Vec<WidgetRecord>,
    pending: HashMap<String, WidgetEdit>,
}

impl WidgetRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an edit for the widget with `label`
    pub fn queue_edit(&mut self, label: impl Into<String>, edit: WidgetEdit) {
        self.pending.insert(label.into(), edit);
    }

    /// Widgets registered since the last [`WidgetRecorder::begin_frame`]
    pub fn widgets(&self) -> &[WidgetRecord] {
        &self.widgets
    }

    /// Labels registered since the last [`WidgetRecorder::begin_frame`]
    pub fn labels(&self) -> Vec<&str> {
        self.widgets.iter().map(|w| w.label.as_str()).collect()
    }

    /// Registered widget with `label`, if any
    pub fn find(&self, label: &str) -> Option<&WidgetRecord> {
        self.widgets.iter().find(|w| w.label == label)
    }

    /// Forget registrations from the previous frame
    pub fn begin_frame(&mut self) {
        self.widgets.clear();
    }

    fn record(&mut self, label: &str, kind: WidgetKind) -> Option<WidgetEdit> {
        self.widgets.push(WidgetRecord {
            label: label.to_string(),
            kind,
        });
        self.pending.remove(label)
    }
}

fn write3(target: &mut [f32], values: [f32; 3]) {
    for (slot, value) in target.iter_mut().zip(values) {
        *slot = value;
    }
}

impl ParameterSurface for WidgetRecorder {
    fn checkbox(&mut self, label: &str, value: &mut bool) {
        if let Some(WidgetEdit::Bool(edit)) = self.record(label, WidgetKind::Checkbox) {
            *value = edit;
        }
    }

    fn slider(&mut self, label: &str, value: &mut f32, range: SliderRange) {
        if let Some(WidgetEdit::Float(edit)) = self.record(label, WidgetKind::Slider(range)) {
            *value = edit.clamp(range.min, range.max);
        }
    }

    fn color_edit3(&mut self, label: &str, rgb: &mut [f32]) {
        if let Some(WidgetEdit::Float3(edit)) = self.record(label, WidgetKind::Color) {
            write3(rgb, edit);
        }
    }

    fn drag_float3(&mut self, label: &str, values: &mut [f32]) {
        if let Some(WidgetEdit::Float3(edit)) = self.record(label, WidgetKind::Drag3) {
            write3(values, edit);
        }
    }
}
