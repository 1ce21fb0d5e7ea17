use crate::command::{Command, CommandContext, DecodeMode, ImportOutcome};
use crate::config::SketchConfig;
use crate::file_handler::Exporter;
use crate::input::InputHandler;
use crate::panels::{central_panel, tools_panel};
use crate::state::{BlobStore, DrawingState, Preferences};
use crate::texture_manager::TextureManager;

/// Storage key for the pen preferences
const PREFERENCES_KEY: &str = "sketchpad_preferences";

pub struct SketchApp {
    context: CommandContext,
    input: InputHandler,
    texture: TextureManager,
    /// Last failure worth showing to the user
    status: Option<String>,
}

impl std::fmt::Debug for SketchApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SketchApp")
            .field("context", &self.context)
            .field("status", &self.status)
            .finish()
    }
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let preferences: Preferences = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, PREFERENCES_KEY))
            .unwrap_or_default();
        let config = SketchConfig::default();
        let (store, exporter) = platform_io(&config);

        let mut context = CommandContext::new(
            config,
            DrawingState::from_preferences(&preferences),
            DecodeMode::Background,
            store,
            exporter,
        );
        let egui_ctx = cc.egui_ctx.clone();
        context
            .history
            .set_import_waker(move || egui_ctx.request_repaint());
        log::info!(
            "Canvas {}x{}, history limit {}",
            context.config.canvas_width,
            context.config.canvas_height,
            context.config.history_capacity
        );
        Self::with_context(context)
    }

    /// Builds the app around an existing context, without any window
    pub fn with_context(context: CommandContext) -> Self {
        Self {
            context,
            input: InputHandler::new(egui::Rect::NOTHING),
            texture: TextureManager::new(),
            status: None,
        }
    }

    /// Runs `command`, logging and surfacing any failure
    pub fn execute(&mut self, command: Command) {
        log::trace!("Executing {}", command.name());
        match command.execute(&mut self.context) {
            Ok(()) => {
                if matches!(command, Command::Save | Command::Retrieve) {
                    self.status = None;
                }
            }
            Err(err) => {
                log::error!("{} failed: {}", command.name(), err);
                self.status = Some(format!("{} failed: {}", command.name(), err));
            }
        }
    }

    /// Lands any finished snapshot decode on the surface
    pub fn poll_imports(&mut self) {
        if let ImportOutcome::Failed(err) =
            self.context.history.poll_imports(&mut self.context.surface)
        {
            self.status = Some(format!("Could not load image: {}", err));
        }
    }

    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    pub fn input_mut(&mut self) -> &mut InputHandler {
        &mut self.input
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn surface_texture(&mut self, ctx: &egui::Context) -> egui::TextureId {
        self.texture.texture_for(&self.context.surface, ctx)
    }
}

impl eframe::App for SketchApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, PREFERENCES_KEY, &self.context.renderer.state().preferences());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Decodes started below wake the next frame through the import waker
        self.poll_imports();

        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn platform_io(config: &SketchConfig) -> (Box<dyn BlobStore>, Box<dyn Exporter>) {
    use crate::file_handler::DirExporter;
    use crate::state::DirStore;

    (
        Box::new(DirStore::new(&config.data_dir)),
        Box::new(DirExporter::new(&config.data_dir)),
    )
}

#[cfg(target_arch = "wasm32")]
fn platform_io(_config: &SketchConfig) -> (Box<dyn BlobStore>, Box<dyn Exporter>) {
    use crate::file_handler::DownloadExporter;
    use crate::state::LocalStorageStore;

    (Box::new(LocalStorageStore), Box::new(DownloadExporter))
}
