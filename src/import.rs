//! Image import: decode user-selected files into drawable pixels.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use canvas::surface::{ImageData, ImageDataError, ImageHandle};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error(transparent)]
    Buffer(#[from] ImageDataError),
    #[error("unsupported image source {0:?}")]
    UnsupportedSource(String),
    #[error("decode task failed: {0}")]
    Task(String),
}

/// Decode encoded bytes (PNG, JPEG, GIF, WebP, BMP, ...) to straight RGBA8.
///
/// # Errors
///
/// Returns [`ImportError::Decode`] for unrecognized or corrupt data and
/// [`ImportError::Empty`] for a zero-sized image.
pub fn decode_image(bytes: &[u8]) -> Result<ImageData, ImportError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ImportError::Empty { width, height });
    }
    Ok(ImageData::new(width, height, rgba.into_raw())?)
}

/// Read and decode an image file.
///
/// # Errors
///
/// Returns [`ImportError::Io`] if the file cannot be read, otherwise as
/// [`decode_image`].
pub fn load_image(path: &Path) -> Result<ImageHandle, ImportError> {
    let bytes = std::fs::read(path).map_err(|source| ImportError::Io { path: path.to_owned(), source })?;
    let image = decode_image(&bytes)?;
    debug!(path = %path.display(), width = image.width(), height = image.height(), "image decoded");
    Ok(Arc::new(image))
}

/// Decode an image file on the blocking pool.
///
/// # Errors
///
/// As [`load_image`], plus [`ImportError::Task`] if the decode task panicked
/// or was cancelled.
pub async fn load_image_async(path: PathBuf) -> Result<ImageHandle, ImportError> {
    tokio::task::spawn_blocking(move || load_image(&path))
        .await
        .map_err(|e| ImportError::Task(e.to_string()))?
}

/// Resolve an image shape's recorded `src` to a file path.
///
/// Browser data URLs cannot be re-read here.
///
/// # Errors
///
/// Returns [`ImportError::UnsupportedSource`] for `data:`, `blob:` and
/// `http(s):` sources.
pub fn source_path(src: &str) -> Result<PathBuf, ImportError> {
    let scheme = src.split_once(':').map(|(s, _)| s.to_ascii_lowercase());
    match scheme.as_deref() {
        Some("data" | "blob" | "http" | "https") => Err(ImportError::UnsupportedSource(truncate(src))),
        _ => Ok(PathBuf::from(src.strip_prefix("file://").unwrap_or(src))),
    }
}

fn truncate(src: &str) -> String {
    src.chars().take(48).collect()
}

#[cfg(test)]
#[path = "import_test.rs"]
mod tests;
