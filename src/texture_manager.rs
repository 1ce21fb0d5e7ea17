use egui::{Context, TextureHandle, TextureId, TextureOptions};

use crate::surface::RasterSurface;

/// Keeps the GPU copy of the surface in sync, re-uploading only when the
/// surface revision changes
#[derive(Default)]
pub struct TextureManager {
    handle: Option<TextureHandle>,
    uploaded_revision: Option<u64>,
    uploads: u64,
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("uploaded_revision", &self.uploaded_revision)
            .field("uploads", &self.uploads)
            .finish()
    }
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the texture for `surface`, uploading it first if stale
    pub fn texture_for(&mut self, surface: &RasterSurface, ctx: &Context) -> TextureId {
        let fresh = self.uploaded_revision == Some(surface.revision());
        if let (true, Some(handle)) = (fresh, &self.handle) {
            return handle.id();
        }

        let image = surface.to_color_image();
        let id = match self.handle.take() {
            Some(mut handle) => {
                handle.set(image, TextureOptions::NEAREST);
                let id = handle.id();
                self.handle = Some(handle);
                id
            }
            None => {
                let handle = ctx.load_texture("sketch_surface", image, TextureOptions::NEAREST);
                let id = handle.id();
                self.handle = Some(handle);
                id
            }
        };
        self.uploaded_revision = Some(surface.revision());
        self.uploads += 1;
        log::trace!("Uploaded surface revision {}", surface.revision());
        id
    }

    /// Number of uploads performed so far
    pub fn upload_count(&self) -> u64 {
        self.uploads
    }

    /// Forces the next call to upload again
    pub fn invalidate(&mut self) {
        self.uploaded_revision = None;
    }
}
