use egui::{Key, PointerButton};

use super::InputEvent;
use crate::command::Command;

/// Translates an input event into the command it triggers, if any.
///
/// This is the only place pointer and keyboard input turn into commands.
pub fn route_event(event: &InputEvent) -> Option<Command> {
    match event {
        InputEvent::PointerDown {
            location,
            button: PointerButton::Primary,
        } if location.in_canvas => Some(Command::BeginStroke(location.position)),

        InputEvent::PointerMove { location } if location.in_canvas => {
            Some(Command::ExtendStroke(location.position))
        }

        InputEvent::PointerUp {
            button: PointerButton::Primary,
            ..
        } => Some(Command::EndStroke),

        InputEvent::PointerLeave { .. } => Some(Command::EndStroke),

        InputEvent::KeyDown { key, modifiers } if modifiers.command => match key {
            Key::Z => Some(Command::Undo),
            Key::Y => Some(Command::Redo),
            _ => None,
        },

        _ => None,
    }
}
