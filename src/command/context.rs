use super::History;
use super::import::DecodeMode;
use crate::config::SketchConfig;
use crate::file_handler::Exporter;
use crate::renderer::StrokeRenderer;
use crate::state::{BlobStore, DrawingState};
use crate::surface::RasterSurface;

/// Everything a command can touch: the surface, the pen, the history and
/// the outside world (blob store and exporter).
pub struct CommandContext {
    /// The canvas being drawn on
    pub surface: RasterSurface,
    /// Pen state and drawing primitives
    pub renderer: StrokeRenderer,
    /// Undo/redo snapshots
    pub history: History,
    /// Where saves go and retrieves come from
    pub store: Box<dyn BlobStore>,
    /// Receives the PNG on save
    pub exporter: Box<dyn Exporter>,
    pub config: SketchConfig,
}

impl std::fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("surface", &format!("{}x{}", self.surface.width(), self.surface.height()))
            .field("renderer", &self.renderer)
            .field("history", &self.history)
            .field("config", &self.config)
            .finish()
    }
}

impl CommandContext {
    /// Create a new command context with a blank surface
    pub fn new(
        config: SketchConfig,
        drawing: DrawingState,
        decode_mode: DecodeMode,
        store: Box<dyn BlobStore>,
        exporter: Box<dyn Exporter>,
    ) -> Self {
        Self {
            surface: RasterSurface::new(config.canvas_width, config.canvas_height),
            renderer: StrokeRenderer::new(drawing),
            history: History::new(config.history_capacity, decode_mode),
            store,
            exporter,
            config,
        }
    }
}
