use crate::SketchApp;
use crate::input::route_event;
use egui::{Color32, Rect, Sense, pos2, vec2};

pub fn central_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let surface = &app.context().surface;
        let size = vec2(surface.width() as f32, surface.height() as f32);

        egui::ScrollArea::both().show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(size, Sense::drag());
            let canvas_rect = response.rect;

            // Handle input
            app.input_mut().set_canvas_rect(canvas_rect);
            let events = app.input_mut().process_input(ctx);
            for event in &events {
                if let Some(command) = route_event(event) {
                    app.execute(command);
                }
            }

            // Render the canvas
            let texture = app.surface_texture(ctx);
            painter.rect_filled(canvas_rect, 0.0, Color32::WHITE);
            painter.image(
                texture,
                canvas_rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        });
    });
}
