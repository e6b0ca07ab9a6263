//! Software raster target backed by `tiny-skia`.
//!
//! Coordinates arrive in scene units and are scaled by the surface's pixel
//! density, so one scene renders identically at 1x on screen and at 2x for
//! export. Text is drawn from system font outlines; when no font is
//! installed text is skipped rather than failing the frame.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use rusttype::{OutlineBuilder, Scale, point as rt_point};
use tiny_skia::{
    Color, ColorU8, FillRule, FilterQuality, IntSize, Paint, PathBuilder, Pattern, Pixmap, SpreadMode, Stroke,
    StrokeDash, Transform,
};

use crate::camera::Point;
use crate::color::Rgba;
use crate::fonts;
use crate::surface::{FontSpec, ImageData, Path, PathOp, Rect, StrokeStyle, Surface};

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("invalid surface size {width}x{height} at density {density}")]
    InvalidSize { width: f64, height: f64, density: f64 },
    #[error("image {width}x{height} cannot be rasterized")]
    InvalidImage { width: u32, height: u32 },
}

/// An owned RGBA pixel buffer that scene units are painted into.
pub struct PixmapSurface {
    pixmap: Pixmap,
    density: f64,
}

impl PixmapSurface {
    /// A transparent surface covering `width × height` scene units at
    /// `density` device pixels per unit.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::InvalidSize`] if the pixel size is zero, not
    /// finite, or too large to allocate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(width: f64, height: f64, density: f64) -> Result<Self, RasterError> {
        let invalid = || RasterError::InvalidSize { width, height, density };
        let px_w = (width * density).ceil();
        let px_h = (height * density).ceil();
        if !px_w.is_finite() || !px_h.is_finite() || px_w < 1.0 || px_h < 1.0 || px_w > f64::from(u32::MAX) || px_h > f64::from(u32::MAX) {
            return Err(invalid());
        }
        let pixmap = Pixmap::new(px_w as u32, px_h as u32).ok_or_else(invalid)?;
        Ok(Self { pixmap, density })
    }

    /// Width in device pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in device pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    #[must_use]
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Straight-alpha RGBA of one device pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// The whole buffer as straight-alpha RGBA8, row-major.
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixmap.data().len());
        for p in self.pixmap.pixels() {
            let c = p.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    #[allow(clippy::cast_possible_truncation)]
    fn transform(&self) -> Transform {
        Transform::from_scale(self.density as f32, self.density as f32)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn sk_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for op in path.ops() {
        match *op {
            PathOp::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathOp::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathOp::Close => pb.close(),
            PathOp::Circle { center, radius } => pb.push_circle(center.x as f32, center.y as f32, radius as f32),
        }
    }
    pb.finish()
}

fn solid(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.alpha_u8());
    paint.anti_alias = true;
    paint
}

/// Convert straight-alpha pixels to a premultiplied pixmap.
fn image_pixmap(image: &ImageData) -> Result<Pixmap, RasterError> {
    let invalid = || RasterError::InvalidImage { width: image.width(), height: image.height() };
    let size = IntSize::from_wh(image.width(), image.height()).ok_or_else(invalid)?;
    let mut data = Vec::with_capacity(image.pixels().len());
    for px in image.pixels().chunks_exact(4) {
        let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Pixmap::from_vec(data, size).ok_or_else(invalid)
}

/// Collects glyph outlines into a tiny-skia path, shifted by an origin.
struct GlyphPath {
    pb: PathBuilder,
    dx: f32,
    dy: f32,
}

impl OutlineBuilder for GlyphPath {
    fn move_to(&mut self, x: f32, y: f32) {
        self.pb.move_to(x + self.dx, y + self.dy);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.pb.line_to(x + self.dx, y + self.dy);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.pb.quad_to(x1 + self.dx, y1 + self.dy, x + self.dx, y + self.dy);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.pb
            .cubic_to(x1 + self.dx, y1 + self.dy, x2 + self.dx, y2 + self.dy, x + self.dx, y + self.dy);
    }

    fn close(&mut self) {
        self.pb.close();
    }
}

impl Surface for PixmapSurface {
    type Error = RasterError;

    fn clear(&mut self) -> Result<(), RasterError> {
        self.pixmap.fill(Color::TRANSPARENT);
        Ok(())
    }

    fn fill_path(&mut self, path: &Path, color: Rgba) -> Result<(), RasterError> {
        if let Some(p) = sk_path(path) {
            let transform = self.transform();
            self.pixmap.fill_path(&p, &solid(color), FillRule::Winding, transform, None);
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn stroke_path(&mut self, path: &Path, style: &StrokeStyle) -> Result<(), RasterError> {
        let Some(p) = sk_path(path) else {
            return Ok(());
        };
        let mut stroke = Stroke { width: style.width as f32, ..Stroke::default() };
        if let Some([on, off]) = style.dash {
            stroke.dash = StrokeDash::new(vec![on as f32, off as f32], 0.0);
        }
        let transform = self.transform();
        self.pixmap.stroke_path(&p, &solid(style.color), &stroke, transform, None);
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn fill_text(&mut self, text: &str, at: Point, font: &FontSpec, color: Rgba) -> Result<(), RasterError> {
        if text.is_empty() || font.size <= 0.0 {
            return Ok(());
        }
        let Some(face) = fonts::font_for(&font.family, font.bold) else {
            return Ok(());
        };
        let scale = Scale::uniform(font.size as f32);
        let v = face.v_metrics(scale);
        let glyphs: Vec<_> = face.layout(text, scale, rt_point(0.0, 0.0)).collect();
        let width = glyphs
            .last()
            .map_or(0.0, |g| g.position().x + g.unpositioned().h_metrics().advance_width);

        // Center horizontally; put the middle of the em box on `at.y`.
        let mut builder = GlyphPath {
            pb: PathBuilder::new(),
            dx: at.x as f32 - width / 2.0,
            dy: at.y as f32 + (v.ascent + v.descent) / 2.0,
        };
        for glyph in &glyphs {
            glyph.build_outline(&mut builder);
        }
        if let Some(p) = builder.pb.finish() {
            let transform = self.transform();
            self.pixmap.fill_path(&p, &solid(color), FillRule::Winding, transform, None);
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw_image(&mut self, image: &ImageData, dest: Rect, opacity: f64) -> Result<(), RasterError> {
        let src = image_pixmap(image)?;
        let Some(rect) = tiny_skia::Rect::from_xywh(dest.x as f32, dest.y as f32, dest.w as f32, dest.h as f32) else {
            return Ok(());
        };
        let sx = dest.w / f64::from(image.width());
        let sy = dest.h / f64::from(image.height());
        let placement = Transform::from_row(sx as f32, 0.0, 0.0, sy as f32, dest.x as f32, dest.y as f32);
        let paint = Paint {
            shader: Pattern::new(src.as_ref(), SpreadMode::Pad, FilterQuality::Bilinear, opacity as f32, placement),
            ..Paint::default()
        };
        let transform = self.transform();
        self.pixmap.fill_rect(rect, &paint, transform, None);
        Ok(())
    }
}
