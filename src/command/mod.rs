mod commands;
mod context;
mod history;
mod import;

use thiserror::Error;

use crate::file_handler::ExportError;
use crate::snapshot::SnapshotError;
use crate::state::PersistenceError;

pub use commands::Command;
pub use context::CommandContext;
pub use history::{HISTORY_LIMIT, History, HistoryStack};
pub use import::{DecodeMode, ImportOutcome, ImportQueue};

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during command execution
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
