use std::collections::VecDeque;

use super::CommandResult;
use super::import::{DecodeMode, ImportOutcome, ImportQueue};
use crate::snapshot::Snapshot;
use crate::surface::RasterSurface;

/// Default number of snapshots each stack keeps
pub const HISTORY_LIMIT: usize = 20;

/// A bounded stack of snapshots.
///
/// Pops are LIFO. Pushing onto a full stack evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<Snapshot>,
    capacity: usize,
}

impl HistoryStack {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Pushes `snapshot`, returning the evicted oldest entry if the stack was full
    pub fn push(&mut self, snapshot: Snapshot) -> Option<Snapshot> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(snapshot);
        evicted
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop_back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }
}

/// Snapshot-based undo/redo history for a single surface
#[derive(Debug)]
pub struct History {
    /// Surfaces as they were before each mutating action
    undo_stack: HistoryStack,
    /// Surfaces as they were before each undo
    redo_stack: HistoryStack,
    imports: ImportQueue,
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT, DecodeMode::Inline)
    }
}

impl History {
    pub fn new(capacity: usize, mode: DecodeMode) -> Self {
        Self {
            undo_stack: HistoryStack::new(capacity),
            redo_stack: HistoryStack::new(capacity),
            imports: ImportQueue::new(mode),
        }
    }

    /// Captures the pre-mutation surface onto the undo stack
    pub fn checkpoint(&mut self, surface: &mut RasterSurface) -> CommandResult {
        self.settle_earlier(surface);
        let snapshot = Snapshot::capture(surface)?;
        if self.undo_stack.push(snapshot).is_some() {
            log::trace!("Undo stack full, dropped oldest snapshot");
        }
        Ok(())
    }

    /// Invalidates everything that could be redone
    pub fn notify_mutation(&mut self) {
        self.redo_stack.clear();
    }

    /// Restores the most recent undo snapshot. No-op when there is none.
    pub fn undo(&mut self, surface: &mut RasterSurface) -> CommandResult {
        self.settle_earlier(surface);
        step(
            &mut self.undo_stack,
            &mut self.redo_stack,
            &mut self.imports,
            surface,
        )
    }

    /// Reapplies the most recently undone snapshot. No-op when there is none.
    pub fn redo(&mut self, surface: &mut RasterSurface) -> CommandResult {
        self.settle_earlier(surface);
        step(
            &mut self.redo_stack,
            &mut self.undo_stack,
            &mut self.imports,
            surface,
        )
    }

    /// Forgets all history and clears the surface
    pub fn undo_all(&mut self, surface: &mut RasterSurface) {
        self.imports.cancel();
        self.undo_stack.clear();
        self.redo_stack.clear();
        surface.clear();
    }

    /// Replaces the surface with `snapshot` without touching either stack
    pub fn import(&mut self, snapshot: Snapshot, surface: &mut RasterSurface) -> CommandResult {
        self.imports.request(snapshot);
        self.settle(surface)
    }

    /// See [`ImportQueue::set_waker`]
    pub fn set_import_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.imports.set_waker(waker);
    }

    /// Applies a finished import, if there is one
    pub fn poll_imports(&mut self, surface: &mut RasterSurface) -> ImportOutcome {
        self.imports.poll(surface)
    }

    /// Blocks until the in-flight import lands
    #[cfg(not(target_arch = "wasm32"))]
    pub fn wait_for_import(&mut self, surface: &mut RasterSurface) -> ImportOutcome {
        self.imports.wait(surface)
    }

    pub fn import_pending(&self) -> bool {
        self.imports.is_pending()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_stack(&self) -> &HistoryStack {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &HistoryStack {
        &self.redo_stack
    }

    /// Applies the import just requested if it already finished
    fn settle(&mut self, surface: &mut RasterSurface) -> CommandResult {
        settle(&mut self.imports, surface)
    }

    // Anything captured while a decode is still running sees stale pixels.
    // Finished decodes are applied first so the common case is exact.
    fn settle_earlier(&mut self, surface: &mut RasterSurface) {
        if let Err(err) = self.settle(surface) {
            log::warn!("Earlier snapshot restore failed: {}", err);
        }
    }
}

fn settle(imports: &mut ImportQueue, surface: &mut RasterSurface) -> CommandResult {
    match imports.poll(surface) {
        ImportOutcome::Failed(err) => Err(err.into()),
        _ => Ok(()),
    }
}

/// Restores the newest snapshot on `from`, recording the current
/// surface on `to`.
///
/// A restore that fails on the spot puts `from` back as it was. A background
/// decode that fails later leaves the stacks shifted; that only matters for
/// snapshots not produced by `Snapshot::capture`, which always decode.
fn step(
    from: &mut HistoryStack,
    to: &mut HistoryStack,
    imports: &mut ImportQueue,
    surface: &mut RasterSurface,
) -> CommandResult {
    if from.is_empty() {
        return Ok(());
    }
    let current = Snapshot::capture(surface)?;
    let Some(target) = from.pop() else {
        return Ok(());
    };
    imports.request(target.clone());
    if let Err(err) = settle(imports, surface) {
        from.push(target);
        return Err(err);
    }
    to.push(current);
    Ok(())
}
