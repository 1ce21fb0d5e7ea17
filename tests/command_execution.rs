use std::sync::Arc;

use egui::{Color32, pos2};
use parking_lot::Mutex;
use sketchpad::command::{Command, CommandContext, CommandError, DecodeMode};
use sketchpad::file_handler::{ExportError, Exporter};
use sketchpad::snapshot::SnapshotError;
use sketchpad::state::{BlobStore, DrawingState, MemoryStore};
use sketchpad::{SketchApp, SketchConfig, Snapshot};

// Records every export so tests can inspect what the user would download
#[derive(Clone, Default)]
struct RecordingExporter {
    files: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl Exporter for RecordingExporter {
    fn export(&mut self, filename: &str, bytes: &[u8]) -> Result<(), ExportError> {
        self.files.lock().push((filename.to_owned(), bytes.to_vec()));
        Ok(())
    }
}

// Helper to create a test context whose store and exporter stay observable
fn create_test_context() -> (CommandContext, MemoryStore, RecordingExporter) {
    let store = MemoryStore::new();
    let exporter = RecordingExporter::default();
    let config = SketchConfig {
        canvas_width: 80,
        canvas_height: 50,
        ..Default::default()
    };
    let ctx = CommandContext::new(
        config,
        DrawingState::default(),
        DecodeMode::Inline,
        Box::new(store.clone()),
        Box::new(exporter.clone()),
    );
    (ctx, store, exporter)
}

#[test]
fn test_save_writes_slot_and_exports_png() {
    let (mut ctx, store, exporter) = create_test_context();
    Command::FillBackground(Color32::WHITE).execute(&mut ctx).unwrap();

    Command::Save.execute(&mut ctx).unwrap();

    let stored = store.get("canvasContents").unwrap().unwrap();
    assert!(stored.starts_with("data:image/png;base64,"));

    let files = exporter.files.lock();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, "my-Canvas.png");
    assert_eq!(
        Snapshot::from_data_url(&stored).unwrap().as_bytes(),
        files[0].1.as_slice()
    );
}

#[test]
fn test_save_is_not_a_mutation() {
    let (mut ctx, _store, _exporter) = create_test_context();
    Command::FillBackground(Color32::WHITE).execute(&mut ctx).unwrap();
    Command::Undo.execute(&mut ctx).unwrap();

    Command::Save.execute(&mut ctx).unwrap();

    assert!(ctx.history.can_redo());
    assert!(!ctx.history.can_undo());
}

#[test]
fn test_retrieve_restores_saved_canvas() {
    let (mut ctx, _store, _exporter) = create_test_context();
    Command::SetLineWidth(4.0).execute(&mut ctx).unwrap();
    Command::BeginStroke(pos2(5.0, 25.0)).execute(&mut ctx).unwrap();
    Command::ExtendStroke(pos2(75.0, 25.0)).execute(&mut ctx).unwrap();
    Command::EndStroke.execute(&mut ctx).unwrap();
    let saved = ctx.surface.pixels().clone();

    Command::Save.execute(&mut ctx).unwrap();
    Command::Clear.execute(&mut ctx).unwrap();
    assert!(ctx.surface.is_blank());

    Command::Retrieve.execute(&mut ctx).unwrap();
    assert_eq!(ctx.surface.pixels(), &saved);
}

#[test]
fn test_retrieve_with_empty_slot_changes_nothing() {
    let (mut ctx, _store, _exporter) = create_test_context();
    Command::FillBackground(Color32::RED).execute(&mut ctx).unwrap();
    Command::FillBackground(Color32::BLUE).execute(&mut ctx).unwrap();
    Command::Undo.execute(&mut ctx).unwrap();
    let revision = ctx.surface.revision();

    Command::Retrieve.execute(&mut ctx).unwrap();

    assert_eq!(ctx.surface.revision(), revision);
    assert_eq!(ctx.surface.pixel(0, 0), Some(Color32::RED));
    assert_eq!(ctx.history.undo_stack().len(), 1);
    assert_eq!(ctx.history.redo_stack().len(), 1);
}

#[test]
fn test_retrieve_rejects_garbage_without_touching_surface() {
    let (mut ctx, mut store, _exporter) = create_test_context();
    Command::FillBackground(Color32::GREEN).execute(&mut ctx).unwrap();
    store.set("canvasContents", "definitely not an image").unwrap();

    let err = Command::Retrieve.execute(&mut ctx).unwrap_err();

    assert!(matches!(err, CommandError::Snapshot(SnapshotError::NotADataUrl)));
    assert_eq!(ctx.surface.pixel(10, 10), Some(Color32::GREEN));
}

#[test]
fn test_corrupt_png_in_slot_surfaces_warning_in_app() {
    let (ctx, mut store, _exporter) = create_test_context();
    let mut app = SketchApp::with_context(ctx);
    app.execute(Command::FillBackground(Color32::GREEN));

    // Valid data URL, but the payload is not a PNG
    store
        .set("canvasContents", "data:image/png;base64,aGVsbG8gd29ybGQ=")
        .unwrap();
    app.execute(Command::Retrieve);
    app.poll_imports();

    assert!(app.status().is_some());
    assert_eq!(app.context().surface.pixel(10, 10), Some(Color32::GREEN));
}

#[test]
fn test_app_reports_failed_commands() {
    struct BrokenExporter;

    impl Exporter for BrokenExporter {
        fn export(&mut self, _filename: &str, _bytes: &[u8]) -> Result<(), ExportError> {
            Err(ExportError::Browser("blocked".to_owned()))
        }
    }

    let ctx = CommandContext::new(
        SketchConfig::default(),
        DrawingState::default(),
        DecodeMode::Inline,
        Box::new(MemoryStore::new()),
        Box::new(BrokenExporter),
    );
    let mut app = SketchApp::with_context(ctx);

    app.execute(Command::Save);

    let status = app.status().unwrap();
    assert!(status.contains("Save failed"));
    assert!(status.contains("blocked"));
}

#[test]
fn test_stroke_uses_current_pen() {
    let (mut ctx, _store, _exporter) = create_test_context();
    Command::SetStrokeColor(Color32::RED).execute(&mut ctx).unwrap();
    Command::SetLineWidth(6.0).execute(&mut ctx).unwrap();

    Command::BeginStroke(pos2(10.0, 10.0)).execute(&mut ctx).unwrap();
    Command::ExtendStroke(pos2(60.0, 10.0)).execute(&mut ctx).unwrap();

    assert_eq!(ctx.surface.pixel(35, 12), Some(Color32::RED));
    assert_eq!(ctx.surface.pixel(35, 20), Some(Color32::TRANSPARENT));
}

#[test]
fn test_fill_uses_canvas_color_after_pen_change() {
    let (mut ctx, _store, _exporter) = create_test_context();
    Command::SetFillColor(Color32::YELLOW).execute(&mut ctx).unwrap();
    Command::SetStrokeColor(Color32::RED).execute(&mut ctx).unwrap();

    let staged = ctx.renderer.fill_color();
    Command::FillBackground(staged).execute(&mut ctx).unwrap();

    assert_eq!(ctx.surface.pixel(40, 25), Some(Color32::YELLOW));
    assert_eq!(ctx.renderer.stroke_color(), Color32::RED);
}

#[test]
fn test_background_undo_wakes_app_and_lands_on_next_poll() {
    let config = SketchConfig {
        canvas_width: 32,
        canvas_height: 32,
        ..Default::default()
    };
    let mut ctx = CommandContext::new(
        config,
        DrawingState::default(),
        DecodeMode::Background,
        Box::new(MemoryStore::new()),
        Box::new(RecordingExporter::default()),
    );
    let (woken_tx, woken_rx) = std::sync::mpsc::channel();
    ctx.history.set_import_waker(move || {
        let _ = woken_tx.send(());
    });
    let mut app = SketchApp::with_context(ctx);

    app.execute(Command::FillBackground(Color32::BLUE));
    app.execute(Command::Undo);

    woken_rx
        .recv_timeout(std::time::Duration::from_secs(10))
        .expect("undo decode never woke the app");
    app.poll_imports();

    assert!(app.context().surface.is_blank());
    assert!(!app.context().history.import_pending());
    assert_eq!(app.status(), None);
}
