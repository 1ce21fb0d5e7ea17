#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod config;
pub mod file_handler;
pub mod input;
pub mod panels;
pub mod renderer;
pub mod snapshot;
pub mod state;
pub mod surface;
pub mod texture_manager;

pub use app::SketchApp;
pub use command::{Command, CommandContext, CommandError, CommandResult, DecodeMode, History};
pub use config::SketchConfig;
pub use input::{InputEvent, InputLocation};
pub use renderer::StrokeRenderer;
pub use snapshot::Snapshot;
pub use state::DrawingState;
pub use surface::RasterSurface;
