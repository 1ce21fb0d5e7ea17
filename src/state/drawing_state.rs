use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

/// The pen and pointer state the renderer reads at draw time.
///
/// Has no history of its own; undo only restores pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingState {
    pub stroke_color: Color32,
    pub fill_color: Color32,
    pub line_width: f32,
    pub pointer_down: bool,
    pub last_position: Pos2,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            stroke_color: Color32::BLACK,
            fill_color: Color32::BLACK,
            line_width: 1.0,
            pointer_down: false,
            last_position: Pos2::ZERO,
        }
    }
}

impl DrawingState {
    pub fn from_preferences(preferences: &Preferences) -> Self {
        let [r, g, b, a] = preferences.stroke_color;
        let stroke_color = Color32::from_rgba_unmultiplied(r, g, b, a);
        let [r, g, b, a] = preferences.fill_color;
        let fill_color = Color32::from_rgba_unmultiplied(r, g, b, a);
        let defaults = Self::default();
        Self {
            stroke_color,
            fill_color,
            line_width: if preferences.line_width.is_finite() && preferences.line_width > 0.0 {
                preferences.line_width
            } else {
                defaults.line_width
            },
            ..defaults
        }
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            stroke_color: self.stroke_color.to_srgba_unmultiplied(),
            fill_color: self.fill_color.to_srgba_unmultiplied(),
            line_width: self.line_width,
        }
    }
}

/// Pen settings remembered across restarts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Preferences {
    pub stroke_color: [u8; 4],
    pub fill_color: [u8; 4],
    pub line_width: f32,
}

impl Default for Preferences {
    fn default() -> Self {
        DrawingState::default().preferences()
    }
}
