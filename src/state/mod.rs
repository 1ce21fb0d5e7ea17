mod drawing_state;
mod persistence;

pub use drawing_state::{DrawingState, Preferences};
pub use persistence::{BlobStore, MemoryStore, PersistenceError, PersistenceResult};

#[cfg(not(target_arch = "wasm32"))]
pub use persistence::DirStore;

#[cfg(target_arch = "wasm32")]
pub use persistence::LocalStorageStore;
