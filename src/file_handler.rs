use thiserror::Error;

/// Errors that can occur while exporting an image file
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Browser refused the download: {0}")]
    Browser(String),
}

/// Hands a finished image file to the user
pub trait Exporter {
    fn export(&mut self, filename: &str, bytes: &[u8]) -> Result<(), ExportError>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::DirExporter;

#[cfg(target_arch = "wasm32")]
pub use web::DownloadExporter;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::{ExportError, Exporter};

    /// Writes exports into a directory, overwriting files of the same name
    #[derive(Debug, Clone)]
    pub struct DirExporter {
        dir: PathBuf,
    }

    impl DirExporter {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }
    }

    impl Exporter for DirExporter {
        fn export(&mut self, filename: &str, bytes: &[u8]) -> Result<(), ExportError> {
            // Only the final component is honoured
            let name = Path::new(filename)
                .file_name()
                .map(|n| n.to_owned())
                .unwrap_or_else(|| "export.png".into());
            fs::create_dir_all(&self.dir)?;
            let path = self.dir.join(name);
            fs::write(&path, bytes)?;
            log::info!("Exported {} bytes to {}", bytes.len(), path.display());
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use eframe::wasm_bindgen::JsCast as _;

    use super::{ExportError, Exporter};

    fn js_err(err: eframe::wasm_bindgen::JsValue) -> ExportError {
        ExportError::Browser(format!("{:?}", err))
    }

    /// Triggers a browser download through a temporary anchor element
    #[derive(Debug, Clone, Default)]
    pub struct DownloadExporter;

    impl Exporter for DownloadExporter {
        fn export(&mut self, filename: &str, bytes: &[u8]) -> Result<(), ExportError> {
            let document = web_sys::window()
                .and_then(|window| window.document())
                .ok_or_else(|| ExportError::Browser("no document".to_owned()))?;

            let parts = js_sys::Array::new();
            parts.push(&js_sys::Uint8Array::from(bytes));
            let options = web_sys::BlobPropertyBag::new();
            options.set_type("image/png");
            let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
                .map_err(js_err)?;
            let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err)?;

            let link = document
                .create_element("a")
                .map_err(js_err)?
                .dyn_into::<web_sys::HtmlAnchorElement>()
                .map_err(|_| ExportError::Browser("anchor element expected".to_owned()))?;
            link.set_href(&url);
            link.set_download(filename);
            link.click();

            web_sys::Url::revoke_object_url(&url).map_err(js_err)?;
            log::info!("Downloaded {} ({} bytes)", filename, bytes.len());
            Ok(())
        }
    }
}
