use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

/// Errors that can occur while reading or writing the blob store
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to access stored data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage is unavailable: {0}")]
    Unavailable(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// A string-valued key-value store. Missing keys are `Ok(None)`, not errors.
pub trait BlobStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()>;

    fn remove(&mut self, key: &str) -> PersistenceResult<()>;
}

/// In-memory store. Clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.slots.lock().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        self.slots.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PersistenceResult<()> {
        self.slots.lock().remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::DirStore;

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::PathBuf;

    use super::{BlobStore, PersistenceResult};

    /// Keeps one file per key inside a directory
    #[derive(Debug, Clone)]
    pub struct DirStore {
        dir: PathBuf,
    }

    impl DirStore {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        fn path_for(&self, key: &str) -> PathBuf {
            let name: String = key
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
                .collect();
            self.dir.join(format!("{}.blob", name))
        }
    }

    impl BlobStore for DirStore {
        fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
            match fs::read_to_string(self.path_for(key)) {
                Ok(value) => Ok(Some(value)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
            fs::create_dir_all(&self.dir)?;
            fs::write(self.path_for(key), value)?;
            log::debug!("Stored {} bytes under {}", value.len(), key);
            Ok(())
        }

        fn remove(&mut self, key: &str) -> PersistenceResult<()> {
            match fs::remove_file(self.path_for(key)) {
                Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
                _ => Ok(()),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{BlobStore, PersistenceError, PersistenceResult};

    /// The browser's `window.localStorage`
    #[derive(Debug, Clone, Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        fn storage(&self) -> PersistenceResult<web_sys::Storage> {
            web_sys::window()
                .ok_or_else(|| PersistenceError::Unavailable("no window".to_owned()))?
                .local_storage()
                .map_err(|err| PersistenceError::Unavailable(format!("{:?}", err)))?
                .ok_or_else(|| PersistenceError::Unavailable("localStorage disabled".to_owned()))
        }
    }

    impl BlobStore for LocalStorageStore {
        fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
            self.storage()?
                .get_item(key)
                .map_err(|err| PersistenceError::Unavailable(format!("{:?}", err)))
        }

        fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
            self.storage()?
                .set_item(key, value)
                .map_err(|err| PersistenceError::Unavailable(format!("{:?}", err)))
        }

        fn remove(&mut self, key: &str) -> PersistenceResult<()> {
            self.storage()?
                .remove_item(key)
                .map_err(|err| PersistenceError::Unavailable(format!("{:?}", err)))
        }
    }
}
