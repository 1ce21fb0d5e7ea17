use std::sync::Arc;

use futures::channel::oneshot;
use image::RgbaImage;

use crate::snapshot::{Snapshot, SnapshotError};
use crate::surface::RasterSurface;

type DecodeResult = Result<RgbaImage, SnapshotError>;

/// Called from the decoding side once a result has been sent
pub type ImportWaker = Arc<dyn Fn() + Send + Sync>;

/// Where snapshot decoding runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Decode on the calling thread; the result is ready immediately
    #[default]
    Inline,
    /// Decode off the UI path (a worker thread natively, a local task on the web)
    Background,
}

/// Outcome of polling the pending import
#[derive(Debug)]
pub enum ImportOutcome {
    /// Nothing was requested
    Idle,
    /// A decode is still running; the surface shows stale content
    Pending,
    /// The decoded image replaced the surface contents
    Applied,
    /// The decode failed; the surface was left untouched
    Failed(SnapshotError),
}

struct PendingImport {
    ticket: u64,
    receiver: oneshot::Receiver<DecodeResult>,
}

/// Tracks the single in-flight snapshot import.
///
/// Requesting a new import supersedes the previous one: its receiver is
/// dropped and whatever it decodes is thrown away.
pub struct ImportQueue {
    mode: DecodeMode,
    next_ticket: u64,
    pending: Option<PendingImport>,
    waker: Option<ImportWaker>,
}

impl std::fmt::Debug for ImportQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportQueue")
            .field("mode", &self.mode)
            .field("pending", &self.pending.as_ref().map(|p| p.ticket))
            .field("waker", &self.waker.is_some())
            .finish()
    }
}

impl ImportQueue {
    pub fn new(mode: DecodeMode) -> Self {
        Self {
            mode,
            next_ticket: 0,
            pending: None,
            waker: None,
        }
    }

    /// Installs a callback that fires whenever a decode finishes, so a
    /// frame-polled UI knows to run another frame
    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.waker = Some(Arc::new(waker));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts decoding `snapshot`. Returns the ticket of the new import.
    pub fn request(&mut self, snapshot: Snapshot) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let (sender, receiver) = oneshot::channel();
        if let Some(previous) = self.pending.replace(PendingImport { ticket, receiver }) {
            log::debug!("Import {} superseded by import {}", previous.ticket, ticket);
        }

        let waker = self.waker.clone();
        spawn_decode(self.mode, move || {
            // The receiver is gone if a newer import superseded this one
            if sender.send(snapshot.decode()).is_ok() {
                if let Some(wake) = waker {
                    wake();
                }
            }
        });

        ticket
    }

    /// Drops the in-flight import, if any
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            log::debug!("Import {} cancelled", pending.ticket);
        }
    }

    /// Applies the pending import to `surface` if its decode has finished
    pub fn poll(&mut self, surface: &mut RasterSurface) -> ImportOutcome {
        let Some(pending) = self.pending.as_mut() else {
            return ImportOutcome::Idle;
        };

        let result = match pending.receiver.try_recv() {
            Ok(Some(result)) => result,
            Ok(None) => return ImportOutcome::Pending,
            Err(oneshot::Canceled) => Err(SnapshotError::Abandoned),
        };
        let ticket = pending.ticket;
        self.pending = None;
        finish(ticket, result, surface)
    }

    /// Blocks until the pending import completes and applies it
    #[cfg(not(target_arch = "wasm32"))]
    pub fn wait(&mut self, surface: &mut RasterSurface) -> ImportOutcome {
        let Some(pending) = self.pending.take() else {
            return ImportOutcome::Idle;
        };
        let result = futures::executor::block_on(pending.receiver)
            .unwrap_or(Err(SnapshotError::Abandoned));
        finish(pending.ticket, result, surface)
    }
}

fn finish(ticket: u64, result: DecodeResult, surface: &mut RasterSurface) -> ImportOutcome {
    match result {
        Ok(image) => {
            if image.dimensions() != (surface.width(), surface.height()) {
                log::warn!(
                    "Import {} is {}x{}, surface is {}x{}; drawing at origin",
                    ticket,
                    image.width(),
                    image.height(),
                    surface.width(),
                    surface.height()
                );
            }
            surface.replace_with(&image);
            log::debug!("Import {} applied", ticket);
            ImportOutcome::Applied
        }
        Err(err) => {
            log::warn!("Import {} dropped: {}", ticket, err);
            ImportOutcome::Failed(err)
        }
    }
}

fn spawn_decode(mode: DecodeMode, job: impl FnOnce() + Send + 'static) {
    match mode {
        DecodeMode::Inline => job(),
        DecodeMode::Background => spawn_background(job),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_background(job: impl FnOnce() + Send + 'static) {
    // On failure the job is dropped with its sender, so the import
    // resolves as abandoned on the next poll
    if let Err(err) = std::thread::Builder::new()
        .name("snapshot-decode".to_owned())
        .spawn(job)
    {
        log::error!("Failed to spawn decode thread: {}", err);
    }
}

#[cfg(target_arch = "wasm32")]
fn spawn_background(job: impl FnOnce() + Send + 'static) {
    wasm_bindgen_futures::spawn_local(async move { job() });
}
