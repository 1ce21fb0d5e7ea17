use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

mod router;
pub use router::route_event;

/// Represents the location where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// The position relative to the canvas' top-left corner
    pub position: Pos2,
    /// Whether this position is within the canvas bounds
    pub in_canvas: bool,
}

/// Represents different types of input events that can occur in the application
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button was pressed
    PointerDown {
        location: InputLocation,
        button: PointerButton,
    },
    /// Mouse button was released
    PointerUp {
        location: InputLocation,
        button: PointerButton,
    },
    /// Mouse moved (with or without buttons pressed)
    PointerMove { location: InputLocation },
    /// Mouse left the canvas, or the window altogether
    PointerLeave { last_known_location: InputLocation },
    /// Key was pressed
    KeyDown { key: Key, modifiers: Modifiers },
}

/// Handles converting raw egui input into canvas-local InputEvents
#[derive(Debug)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Rect,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            last_pointer_pos: None,
            canvas_rect,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    /// Creates an InputLocation from a screen position
    fn make_location(&self, pos: Pos2) -> InputLocation {
        InputLocation {
            position: (pos - self.canvas_rect.min).to_pos2(),
            in_canvas: self.canvas_rect.contains(pos),
        }
    }

    /// Process raw egui input and generate our InputEvents
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos();

            // Presses come before the move so a stroke starts where the
            // button went down
            for button in [PointerButton::Primary, PointerButton::Secondary, PointerButton::Middle] {
                if input.pointer.button_pressed(button) {
                    if let Some(pos) = input.pointer.press_origin().or(hover) {
                        events.push(InputEvent::PointerDown {
                            location: self.make_location(pos),
                            button,
                        });
                    }
                }
            }

            match (self.last_pointer_pos, hover) {
                (Some(last), Some(pos)) if last != pos => {
                    if self.canvas_rect.contains(last) && !self.canvas_rect.contains(pos) {
                        // Finish the stroke on the border it crossed
                        let edge = self.make_location(self.canvas_rect.clamp(pos));
                        events.push(InputEvent::PointerMove { location: edge });
                        events.push(InputEvent::PointerLeave {
                            last_known_location: edge,
                        });
                    } else {
                        events.push(InputEvent::PointerMove {
                            location: self.make_location(pos),
                        });
                    }
                }
                (None, Some(pos)) => {
                    events.push(InputEvent::PointerMove {
                        location: self.make_location(pos),
                    });
                }
                (Some(last), None) => {
                    events.push(InputEvent::PointerLeave {
                        last_known_location: self.make_location(last),
                    });
                }
                _ => {}
            }
            self.last_pointer_pos = hover;

            for button in [PointerButton::Primary, PointerButton::Secondary, PointerButton::Middle] {
                if input.pointer.button_released(button) {
                    let pos = hover.or(self.last_pointer_pos).unwrap_or(self.canvas_rect.min);
                    events.push(InputEvent::PointerUp {
                        location: self.make_location(pos),
                        button,
                    });
                }
            }

            for event in &input.raw.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } = event
                {
                    events.push(InputEvent::KeyDown {
                        key: *key,
                        modifiers: *modifiers,
                    });
                }
            }
        });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use egui::{RawInput, pos2, vec2};

    fn run_frame(handler: &mut InputHandler, ctx: &Context, events: Vec<egui::Event>) -> Vec<InputEvent> {
        let mut produced = Vec::new();
        let raw = RawInput {
            events,
            ..Default::default()
        };
        let _ = ctx.run(raw, |ctx| {
            produced = handler.process_input(ctx);
        });
        produced
    }

    #[test]
    fn test_locations_are_canvas_local() {
        let handler = InputHandler::new(Rect::from_min_size(pos2(100.0, 50.0), vec2(800.0, 500.0)));

        let inside = handler.make_location(pos2(110.0, 60.0));
        assert_eq!(inside.position, pos2(10.0, 10.0));
        assert!(inside.in_canvas);

        let outside = handler.make_location(pos2(20.0, 20.0));
        assert!(!outside.in_canvas);
    }

    #[test]
    fn test_key_presses_are_forwarded_with_modifiers() {
        let ctx = Context::default();
        let mut handler = InputHandler::new(Rect::from_min_size(Pos2::ZERO, vec2(800.0, 500.0)));

        let events = run_frame(
            &mut handler,
            &ctx,
            vec![
                egui::Event::Key {
                    key: Key::Z,
                    physical_key: None,
                    pressed: true,
                    repeat: false,
                    modifiers: Modifiers::COMMAND,
                },
                egui::Event::Key {
                    key: Key::Z,
                    physical_key: None,
                    pressed: false,
                    repeat: false,
                    modifiers: Modifiers::COMMAND,
                },
            ],
        );

        assert_eq!(
            events,
            vec![InputEvent::KeyDown {
                key: Key::Z,
                modifiers: Modifiers::COMMAND,
            }]
        );
    }

    #[test]
    fn test_pointer_leaving_canvas_is_reported() {
        let ctx = Context::default();
        let mut handler = InputHandler::new(Rect::from_min_size(Pos2::ZERO, vec2(100.0, 100.0)));

        run_frame(&mut handler, &ctx, vec![egui::Event::PointerMoved(pos2(50.0, 50.0))]);
        let events = run_frame(&mut handler, &ctx, vec![egui::Event::PointerMoved(pos2(150.0, 50.0))]);

        let edge = InputLocation {
            position: pos2(100.0, 50.0),
            in_canvas: true,
        };
        assert_eq!(
            events,
            vec![
                InputEvent::PointerMove { location: edge },
                InputEvent::PointerLeave {
                    last_known_location: edge,
                },
            ]
        );
    }

    #[test]
    fn test_stroke_leaving_canvas_reaches_the_border() {
        let ctx = Context::default();
        let mut handler = InputHandler::new(Rect::from_min_size(Pos2::ZERO, vec2(100.0, 100.0)));

        run_frame(&mut handler, &ctx, vec![egui::Event::PointerMoved(pos2(50.0, 50.0))]);
        let events = run_frame(&mut handler, &ctx, vec![egui::Event::PointerMoved(pos2(150.0, 50.0))]);
        let commands: Vec<Command> = events.iter().filter_map(route_event).collect();

        assert_eq!(
            commands,
            vec![Command::ExtendStroke(pos2(100.0, 50.0)), Command::EndStroke]
        );
    }
}
