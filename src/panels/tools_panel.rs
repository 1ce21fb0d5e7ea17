use crate::SketchApp;
use crate::command::Command;
use egui::color_picker::{Alpha, color_edit_button_srgba};

pub fn tools_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");
            ui.separator();

            let mut stroke_color = app.context().renderer.stroke_color();
            ui.horizontal(|ui| {
                ui.label("Color:");
                if color_edit_button_srgba(ui, &mut stroke_color, Alpha::Opaque).changed() {
                    app.execute(Command::SetStrokeColor(stroke_color));
                }
            });

            let mut line_width = app.context().renderer.line_width();
            ui.horizontal(|ui| {
                ui.label("Line width:");
                if ui.add(egui::Slider::new(&mut line_width, 1.0..=50.0)).changed() {
                    app.execute(Command::SetLineWidth(line_width));
                }
            });

            // Picking a color only stages it; each fill is one undoable action
            let mut fill_color = app.context().renderer.fill_color();
            ui.horizontal(|ui| {
                ui.label("Canvas:");
                if color_edit_button_srgba(ui, &mut fill_color, Alpha::Opaque).changed() {
                    app.execute(Command::SetFillColor(fill_color));
                }
                if ui.button("Fill").clicked() {
                    app.execute(Command::FillBackground(fill_color));
                }
            });

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Clear").clicked() {
                    app.execute(Command::Clear);
                }
                if ui.button("Save").clicked() {
                    app.execute(Command::Save);
                }
                if ui.button("Retrieve").clicked() {
                    app.execute(Command::Retrieve);
                }
            });

            ui.separator();

            // Undo/Redo section
            let history = &app.context().history;
            let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
            let (undo_len, redo_len) = (history.undo_stack().len(), history.redo_stack().len());
            let capacity = history.undo_stack().capacity();

            ui.horizontal(|ui| {
                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.execute(Command::Undo);
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.execute(Command::Redo);
                }
                if ui.button("Undo All").clicked() {
                    app.execute(Command::UndoAll);
                }
            });

            ui.label(format!("Undo stack: {}/{}", undo_len, capacity));
            ui.label(format!("Redo stack: {}/{}", redo_len, capacity));
            ui.weak("Ctrl+Z to undo, Ctrl+Y to redo");

            if app.context().history.import_pending() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading image...");
                });
            }

            if let Some(status) = app.status() {
                ui.separator();
                ui.colored_label(ui.visuals().warn_fg_color, status);
            }
        });
}
