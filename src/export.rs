//! Bitmap export: render shapes (no selection overlay) and encode as PNG.

use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use canvas::engine::EngineCore;
use canvas::raster::{PixmapSurface, RasterError};
use image::{ImageFormat, RgbaImage};
use tracing::info;

use crate::config::clamp_density;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("pixel buffer does not match {width}x{height}")]
    Buffer { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Paint the scene's shapes at `density` device pixels per scene unit.
///
/// # Errors
///
/// Returns [`ExportError::Raster`] if the surface cannot be allocated or a
/// shape fails to paint.
pub fn render_bitmap(core: &EngineCore, density: f64) -> Result<PixmapSurface, ExportError> {
    let mut surface = PixmapSurface::new(core.scene.width(), core.scene.height(), clamp_density(density))?;
    core.render_shapes(&mut surface)?;
    Ok(surface)
}

/// Encode a rendered surface as PNG bytes.
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if encoding fails.
pub fn encode_png(surface: &PixmapSurface) -> Result<Vec<u8>, ExportError> {
    let (width, height) = (surface.width(), surface.height());
    let image = RgbaImage::from_raw(width, height, surface.to_rgba8()).ok_or(ExportError::Buffer { width, height })?;
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Render and encode in one step.
///
/// # Errors
///
/// See [`render_bitmap`] and [`encode_png`].
pub fn export_bitmap(core: &EngineCore, density: f64) -> Result<Vec<u8>, ExportError> {
    encode_png(&render_bitmap(core, density)?)
}

/// Export to a PNG file at `path`.
///
/// # Errors
///
/// See [`export_bitmap`], plus [`ExportError::Io`] if the file cannot be written.
pub fn write_png(core: &EngineCore, density: f64, path: &Path) -> Result<(), ExportError> {
    let bytes = export_bitmap(core, density)?;
    std::fs::write(path, &bytes).map_err(|source| ExportError::Io { path: path.to_owned(), source })?;
    info!(path = %path.display(), bytes = bytes.len(), density, "design exported");
    Ok(())
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
