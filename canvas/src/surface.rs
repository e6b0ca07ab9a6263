//! Raster target abstraction.
//!
//! The renderer never talks to a concrete graphics API. It builds [`Path`]s
//! in scene units and hands them, together with resolved colors, to a
//! [`Surface`]. A surface is free to scale (pixel density) or to forward the
//! calls to a browser 2D context; the renderer's output is fully determined by
//! the scene and the calls it makes here.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::fmt;
use std::sync::Arc;

use crate::camera::Point;
use crate::color::Rgba;

/// One step of a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    Close,
    /// A full circle, as its own closed contour.
    Circle { center: Point, radius: f64 },
}

/// A vector path in scene units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    ops: Vec<PathOp>,
    open: bool,
}

impl Path {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Axis-aligned rectangle with its top-left corner at `(x, y)`.
    #[must_use]
    pub fn rect(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::polygon(&[Point::new(x, y), Point::new(x + w, y), Point::new(x + w, y + h), Point::new(x, y + h)])
    }

    #[must_use]
    pub fn circle(center: Point, radius: f64) -> Self {
        Self { ops: vec![PathOp::Circle { center, radius }], open: false }
    }

    /// Closed polygon through `points`.
    #[must_use]
    pub fn polygon(points: &[Point]) -> Self {
        let mut path = Self::new();
        for p in points {
            path.line_to(*p);
        }
        path.close();
        path
    }

    pub fn move_to(&mut self, p: Point) {
        self.ops.push(PathOp::MoveTo(p));
        self.open = true;
    }

    /// Append a line to `p`. Starts a new contour at `p` when none is open,
    /// like a 2D canvas context does.
    pub fn line_to(&mut self, p: Point) {
        if self.open {
            self.ops.push(PathOp::LineTo(p));
        } else {
            self.move_to(p);
        }
    }

    pub fn close(&mut self) {
        if self.open {
            self.ops.push(PathOp::Close);
            self.open = false;
        }
    }

    #[must_use]
    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// An axis-aligned rectangle in scene units, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of size `w × h` centered on `center`.
    #[must_use]
    pub fn centered(center: Point, w: f64, h: f64) -> Self {
        Self { x: center.x - w / 2.0, y: center.y - h / 2.0, w, h }
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    #[must_use]
    pub fn bottom_right(&self) -> Point {
        Point::new(self.x + self.w, self.y + self.h)
    }

    #[must_use]
    pub fn to_path(&self) -> Path {
        Path::rect(self.x, self.y, self.w, self.h)
    }
}

/// Outline parameters for [`Surface::stroke_path`].
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f64,
    /// Alternating dash/gap lengths; `None` for a solid line.
    pub dash: Option<[f64; 2]>,
}

/// Font selection for [`Surface::fill_text`].
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub bold: bool,
}

impl FontSpec {
    /// CSS font shorthand, e.g. `700 28px Arial`.
    #[must_use]
    pub fn to_css(&self) -> String {
        let weight = if self.bold { 700 } else { 400 };
        format!("{weight} {}px {}", self.size, self.family)
    }
}

/// Error building an [`ImageData`].
#[derive(Debug, thiserror::Error)]
#[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
pub struct ImageDataError {
    pub width: u32,
    pub height: u32,
    pub expected: usize,
    pub actual: usize,
}

/// Decoded image pixels: straight-alpha RGBA8, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageData {
    /// # Errors
    ///
    /// Returns [`ImageDataError`] if `pixels` is not exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageDataError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(ImageDataError { width, height, expected, actual: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Shared handle to decoded image pixels, as attached to an image shape.
pub type ImageHandle = Arc<ImageData>;

/// A raster target the renderer paints into.
///
/// All coordinates are scene units. Implementations own any scale from scene
/// units to device pixels.
pub trait Surface {
    type Error: fmt::Display;

    /// Reset every pixel to transparent.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the target rejects the call.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Fill the interior of `path` (non-zero winding).
    ///
    /// # Errors
    ///
    /// Returns `Err` if the target rejects the call.
    fn fill_path(&mut self, path: &Path, color: Rgba) -> Result<(), Self::Error>;

    /// Stroke the outline of `path`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the target rejects the call.
    fn stroke_path(&mut self, path: &Path, stroke: &StrokeStyle) -> Result<(), Self::Error>;

    /// Draw one line of text centered horizontally and vertically on `at`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the target rejects the call.
    fn fill_text(&mut self, text: &str, at: Point, font: &FontSpec, color: Rgba) -> Result<(), Self::Error>;

    /// Draw `image` stretched into `dest`, multiplied by `opacity`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the target rejects the call.
    fn draw_image(&mut self, image: &ImageData, dest: Rect, opacity: f64) -> Result<(), Self::Error>;

    /// Make the frame painted since the last [`Surface::clear`] visible.
    /// Targets that paint in place have nothing to do.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the target rejects the call.
    fn present(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
