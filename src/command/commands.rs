use egui::{Color32, Pos2};

use super::{CommandContext, CommandResult};
use crate::snapshot::Snapshot;

/// Commands that can be executed against the canvas
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Pointer pressed on the canvas
    BeginStroke(Pos2),
    /// Pointer moved; draws only while a stroke is active
    ExtendStroke(Pos2),
    /// Pointer released or left the canvas
    EndStroke,
    /// Flood the whole canvas with a color
    FillBackground(Color32),
    /// Reset the canvas to transparent
    Clear,
    SetStrokeColor(Color32),
    SetFillColor(Color32),
    SetLineWidth(f32),
    Undo,
    Redo,
    /// Drop all history and clear the canvas
    UndoAll,
    /// Store the canvas in the blob store and export it as a file
    Save,
    /// Load the canvas last stored by `Save`
    Retrieve,
}

impl Command {
    /// Execute the command with the given context
    pub fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        if self.is_mutating() {
            ctx.history.checkpoint(&mut ctx.surface)?;
            ctx.history.notify_mutation();
        }

        match self {
            Command::BeginStroke(position) => {
                ctx.renderer.begin_stroke(*position);
                Ok(())
            }

            Command::ExtendStroke(position) => {
                ctx.renderer.extend_stroke(&mut ctx.surface, *position);
                Ok(())
            }

            Command::EndStroke => {
                ctx.renderer.end_stroke();
                Ok(())
            }

            Command::FillBackground(color) => {
                ctx.renderer.fill_background(&mut ctx.surface, *color);
                Ok(())
            }

            Command::Clear => {
                ctx.renderer.clear(&mut ctx.surface);
                Ok(())
            }

            Command::SetStrokeColor(color) => {
                ctx.renderer.set_stroke_color(*color);
                Ok(())
            }

            Command::SetFillColor(color) => {
                ctx.renderer.set_fill_color(*color);
                Ok(())
            }

            Command::SetLineWidth(width) => {
                ctx.renderer.set_line_width(*width);
                Ok(())
            }

            Command::Undo => ctx.history.undo(&mut ctx.surface),

            Command::Redo => ctx.history.redo(&mut ctx.surface),

            Command::UndoAll => {
                ctx.renderer.end_stroke();
                ctx.history.undo_all(&mut ctx.surface);
                Ok(())
            }

            Command::Save => {
                let snapshot = Snapshot::capture(&ctx.surface)?;
                ctx.store
                    .set(&ctx.config.storage_key, &snapshot.to_data_url())?;
                ctx.exporter
                    .export(&ctx.config.export_filename, snapshot.as_bytes())?;
                log::info!("Saved canvas ({} bytes)", snapshot.as_bytes().len());
                Ok(())
            }

            Command::Retrieve => {
                let Some(stored) = ctx.store.get(&ctx.config.storage_key)? else {
                    log::debug!("Nothing stored under {}", ctx.config.storage_key);
                    return Ok(());
                };
                let snapshot = Snapshot::from_data_url(&stored)?;
                ctx.history.import(snapshot, &mut ctx.surface)
            }
        }
    }

    /// Mutating commands checkpoint the surface and invalidate redo first
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::BeginStroke(_) | Command::FillBackground(_) | Command::Clear
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::BeginStroke(_) => "Begin Stroke",
            Command::ExtendStroke(_) => "Extend Stroke",
            Command::EndStroke => "End Stroke",
            Command::FillBackground(_) => "Fill Background",
            Command::Clear => "Clear",
            Command::SetStrokeColor(_) => "Set Stroke Color",
            Command::SetFillColor(_) => "Set Fill Color",
            Command::SetLineWidth(_) => "Set Line Width",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::UndoAll => "Undo All",
            Command::Save => "Save",
            Command::Retrieve => "Retrieve",
        }
    }
}
