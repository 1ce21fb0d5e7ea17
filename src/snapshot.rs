use std::io::Cursor;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::surface::RasterSurface;

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Errors that can occur while encoding or decoding snapshots
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to encode surface: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Failed to decode snapshot: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Not a PNG data URL")]
    NotADataUrl,

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Snapshot decode was abandoned before completing")]
    Abandoned,
}

/// An immutable PNG encoding of a whole surface.
///
/// Cloning is cheap, the bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    png: Arc<[u8]>,
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("bytes", &self.png.len())
            .finish()
    }
}

impl Snapshot {
    /// Encodes the full contents of `surface`
    pub fn capture(surface: &RasterSurface) -> Result<Self, SnapshotError> {
        let mut buffer = Cursor::new(Vec::new());
        surface
            .pixels()
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(SnapshotError::Encode)?;
        Ok(Self::from_png_bytes(buffer.into_inner()))
    }

    /// Wraps already-encoded PNG bytes. They are only validated on decode.
    pub fn from_png_bytes(bytes: Vec<u8>) -> Self {
        Self { png: bytes.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn decode(&self) -> Result<RgbaImage, SnapshotError> {
        let image = image::load_from_memory_with_format(&self.png, ImageFormat::Png)
            .map_err(SnapshotError::Decode)?;
        Ok(image.to_rgba8())
    }

    /// `data:image/png;base64,...`
    pub fn to_data_url(&self) -> String {
        format!("{DATA_URL_PREFIX}{}", STANDARD.encode(&self.png))
    }

    pub fn from_data_url(url: &str) -> Result<Self, SnapshotError> {
        let payload = url
            .trim()
            .strip_prefix(DATA_URL_PREFIX)
            .ok_or(SnapshotError::NotADataUrl)?;
        Ok(Self::from_png_bytes(STANDARD.decode(payload)?))
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_url())
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let url = String::deserialize(deserializer)?;
        Self::from_data_url(&url).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Color32, pos2};

    fn sample_surface() -> RasterSurface {
        let mut surface = RasterSurface::new(32, 24);
        surface.fill(Color32::WHITE);
        surface.stroke_segment(pos2(2.0, 2.0), pos2(30.0, 20.0), Color32::RED, 3.0);
        surface
    }

    #[test]
    fn test_decode_reproduces_pixels() {
        let surface = sample_surface();
        let snapshot = Snapshot::capture(&surface).unwrap();

        let decoded = snapshot.decode().unwrap();
        assert_eq!(&decoded, surface.pixels());
    }

    #[test]
    fn test_data_url_form() {
        let snapshot = Snapshot::capture(&sample_surface()).unwrap();
        let url = snapshot.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(Snapshot::from_data_url(&url).unwrap(), snapshot);
    }

    #[test]
    fn test_rejects_foreign_data_url() {
        let err = Snapshot::from_data_url("data:text/plain;base64,aGVsbG8=").unwrap_err();
        assert!(matches!(err, SnapshotError::NotADataUrl));

        let err = Snapshot::from_data_url("data:image/png;base64,***").unwrap_err();
        assert!(matches!(err, SnapshotError::Base64(_)));
    }

    #[test]
    fn test_corrupt_bytes_fail_on_decode_only() {
        let snapshot = Snapshot::from_png_bytes(vec![1, 2, 3, 4]);
        assert!(matches!(snapshot.decode(), Err(SnapshotError::Decode(_))));
    }

    #[test]
    fn test_serializes_as_data_url_string() {
        let snapshot = Snapshot::capture(&RasterSurface::new(4, 4)).unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.starts_with("\"data:image/png;base64,"));

        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
