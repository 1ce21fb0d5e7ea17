// src/renderer.rs
use egui::{Color32, Pos2};

use crate::state::DrawingState;
use crate::surface::RasterSurface;

/// Turns a pointer stream into connected segments on a surface and
/// performs whole-surface fills
#[derive(Debug, Default, Clone)]
pub struct StrokeRenderer {
    state: DrawingState,
}

impl StrokeRenderer {
    pub fn new(state: DrawingState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    /// Records the first point of a stroke. Nothing is drawn yet.
    pub fn begin_stroke(&mut self, position: Pos2) {
        self.state.pointer_down = true;
        self.state.last_position = position;
    }

    /// Draws from the last recorded point to `position`.
    ///
    /// Color and width are read now, not at stroke start. Returns false
    /// (and draws nothing) when no stroke is active.
    pub fn extend_stroke(&mut self, surface: &mut RasterSurface, position: Pos2) -> bool {
        if !self.state.pointer_down {
            return false;
        }
        surface.stroke_segment(
            self.state.last_position,
            position,
            self.state.stroke_color,
            self.state.line_width,
        );
        self.state.last_position = position;
        true
    }

    pub fn end_stroke(&mut self) {
        self.state.pointer_down = false;
    }

    pub fn fill_background(&mut self, surface: &mut RasterSurface, color: Color32) {
        self.state.fill_color = color;
        surface.fill(color);
    }

    pub fn clear(&mut self, surface: &mut RasterSurface) {
        surface.clear();
    }

    /// Pen color only; the staged canvas fill is independent
    pub fn set_stroke_color(&mut self, color: Color32) {
        self.state.stroke_color = color;
    }

    /// Stages the color used by the next background fill
    pub fn set_fill_color(&mut self, color: Color32) {
        self.state.fill_color = color;
    }

    pub fn set_line_width(&mut self, width: f32) {
        if !width.is_finite() || width <= 0.0 {
            log::warn!("Ignoring invalid line width {}", width);
            return;
        }
        self.state.line_width = width;
    }

    pub fn stroke_color(&self) -> Color32 {
        self.state.stroke_color
    }

    pub fn fill_color(&self) -> Color32 {
        self.state.fill_color
    }

    pub fn line_width(&self) -> f32 {
        self.state.line_width
    }
}
