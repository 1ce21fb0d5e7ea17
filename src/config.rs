use serde::{Deserialize, Serialize};

use crate::command::HISTORY_LIMIT;

/// Fixed application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Snapshots kept on each of the undo and redo stacks
    pub history_capacity: usize,
    /// Blob store slot holding the last saved canvas
    pub storage_key: String,
    pub export_filename: String,
    /// Native only: where the blob store and exports live
    pub data_dir: String,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 500,
            history_capacity: HISTORY_LIMIT,
            storage_key: "canvasContents".to_owned(),
            export_filename: "my-Canvas.png".to_owned(),
            data_dir: "sketchpad-data".to_owned(),
        }
    }
}
