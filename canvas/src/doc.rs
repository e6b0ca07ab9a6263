//! Scene model: shapes, their styles, the selection, and snapshots.
//!
//! This module defines what is on the canvas (`Shape`, `ShapeKind`), a
//! sparse-update type for creation overrides and inspector edits
//! (`ShapeOverrides`), the serializable projection used for persistence
//! (`Snapshot`), and the runtime owner of all live shapes (`Scene`).
//!
//! Sequence order in `Scene` is the only stacking order: index 0 is painted
//! first and is the last candidate for hit-testing.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::camera::Point;
use crate::hit;
use crate::surface::ImageHandle;

/// Unique, immutable identifier of a shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    /// Fresh random id, e.g. `obj_3f2a…`.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("obj_{}", Uuid::new_v4().simple()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ShapeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of a shape, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Rect,
    Circle,
    Triangle,
    Star,
    Text,
    Image,
}

// ── Defaults ────────────────────────────────────────────────────

pub const DEFAULT_FILL: &str = "#FF6B6B";
pub const DEFAULT_STROKE: &str = "#0f172a";
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_OPACITY: f64 = 1.0;
pub const DEFAULT_STAR_POINTS: u32 = 5;
pub const DEFAULT_TEXT: &str = "New Text";
pub const DEFAULT_FONT_SIZE: f64 = 28.0;
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Fewest spikes a star may have.
pub const MIN_STAR_POINTS: u32 = 3;
/// Most spikes a star may have.
pub const MAX_STAR_POINTS: u32 = 100;

fn default_fill() -> String {
    DEFAULT_FILL.to_owned()
}

fn default_stroke() -> String {
    DEFAULT_STROKE.to_owned()
}

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

fn default_opacity() -> f64 {
    DEFAULT_OPACITY
}

fn default_star_points() -> u32 {
    DEFAULT_STAR_POINTS
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_owned()
}

/// Paint style shared by every shape kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// Interior color as a CSS hex string.
    #[serde(default = "default_fill")]
    pub fill: String,
    /// Outline color as a CSS hex string.
    #[serde(default = "default_stroke")]
    pub stroke: String,
    /// Outline width in scene units; 0 disables the outline.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Global alpha multiplier in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: default_fill(),
            stroke: default_stroke(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            opacity: DEFAULT_OPACITY,
        }
    }
}

/// Kind-specific geometry and content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle of `w × h` centered on the shape position.
    Rect { w: f64, h: f64 },
    /// Circle of radius `r`.
    Circle { r: f64 },
    /// Isosceles triangle, apex up, inscribed in a `w × h` box.
    Triangle { w: f64, h: f64 },
    /// Star with `points` spikes and outer radius `r`.
    Star {
        r: f64,
        #[serde(default = "default_star_points")]
        points: u32,
    },
    /// Text block; `text` may contain line breaks.
    #[serde(rename_all = "camelCase")]
    Text {
        #[serde(default)]
        text: String,
        #[serde(default = "default_font_size")]
        font_size: f64,
        #[serde(default = "default_font_family")]
        font_family: String,
        #[serde(default)]
        bold: bool,
    },
    /// Embedded bitmap. `resource` stays `None` until decoding completes and
    /// is never serialized; `src` is where it can be decoded from again.
    Image {
        w: f64,
        h: f64,
        #[serde(default)]
        src: Option<String>,
        #[serde(skip)]
        resource: Option<ImageHandle>,
    },
}

impl ShapeKind {
    /// Kind payload with the editor's default extents.
    #[must_use]
    pub fn default_for(shape_type: ShapeType) -> Self {
        match shape_type {
            ShapeType::Rect => Self::Rect { w: 200.0, h: 120.0 },
            ShapeType::Circle => Self::Circle { r: 90.0 },
            ShapeType::Triangle => Self::Triangle { w: 180.0, h: 160.0 },
            ShapeType::Star => Self::Star { r: 90.0, points: DEFAULT_STAR_POINTS },
            ShapeType::Text => Self::Text {
                text: DEFAULT_TEXT.to_owned(),
                font_size: DEFAULT_FONT_SIZE,
                font_family: default_font_family(),
                bold: false,
            },
            ShapeType::Image => Self::Image { w: 200.0, h: 140.0, src: None, resource: None },
        }
    }

    #[must_use]
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Self::Rect { .. } => ShapeType::Rect,
            Self::Circle { .. } => ShapeType::Circle,
            Self::Triangle { .. } => ShapeType::Triangle,
            Self::Star { .. } => ShapeType::Star,
            Self::Text { .. } => ShapeType::Text,
            Self::Image { .. } => ShapeType::Image,
        }
    }
}

/// One drawable scene entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    /// Center x in scene units.
    pub x: f64,
    /// Center y in scene units.
    pub y: f64,
    #[serde(flatten)]
    pub style: Style,
    #[serde(flatten)]
    pub kind: ShapeKind,
}

impl Shape {
    /// A shape of the given type with default style and extents, centered on `at`.
    #[must_use]
    pub fn new(id: ShapeId, shape_type: ShapeType, at: Point) -> Self {
        Self { id, x: at.x, y: at.y, style: Style::default(), kind: ShapeKind::default_for(shape_type) }
    }

    #[must_use]
    pub fn shape_type(&self) -> ShapeType {
        self.kind.shape_type()
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The decoded image attached to an image shape, if it has resolved.
    #[must_use]
    pub fn image_resource(&self) -> Option<&ImageHandle> {
        match &self.kind {
            ShapeKind::Image { resource, .. } => resource.as_ref(),
            _ => None,
        }
    }

    /// Apply a sparse update. Fields that do not exist on this kind, and
    /// values that would make the shape degenerate, are ignored.
    ///
    /// Returns `true` if anything changed.
    pub fn apply(&mut self, o: &ShapeOverrides) -> bool {
        let mut changed = false;
        changed |= set_finite(&mut self.x, o.x);
        changed |= set_finite(&mut self.y, o.y);
        if let Some(fill) = &o.fill {
            changed |= set_if_different(&mut self.style.fill, fill.clone());
        }
        if let Some(stroke) = &o.stroke {
            changed |= set_if_different(&mut self.style.stroke, stroke.clone());
        }
        if let Some(sw) = o.stroke_width.filter(|v| v.is_finite() && *v >= 0.0) {
            changed |= set_if_different(&mut self.style.stroke_width, sw);
        }
        if let Some(op) = o.opacity.filter(|v| v.is_finite()) {
            changed |= set_if_different(&mut self.style.opacity, op.clamp(0.0, 1.0));
        }

        match &mut self.kind {
            ShapeKind::Rect { w, h } | ShapeKind::Triangle { w, h } => {
                changed |= set_positive(w, o.w);
                changed |= set_positive(h, o.h);
            }
            ShapeKind::Circle { r } => {
                changed |= set_positive(r, o.r);
            }
            ShapeKind::Star { r, points } => {
                changed |= set_positive(r, o.r);
                if let Some(p) = o.points {
                    changed |= set_if_different(points, p.clamp(MIN_STAR_POINTS, MAX_STAR_POINTS));
                }
            }
            ShapeKind::Text { text, font_size, font_family, bold } => {
                if let Some(t) = &o.text {
                    changed |= set_if_different(text, t.clone());
                }
                changed |= set_positive(font_size, o.font_size);
                if let Some(family) = &o.font_family {
                    changed |= set_if_different(font_family, family.clone());
                }
                if let Some(b) = o.bold {
                    changed |= set_if_different(bold, b);
                }
            }
            ShapeKind::Image { w, h, src, .. } => {
                changed |= set_positive(w, o.w);
                changed |= set_positive(h, o.h);
                if let Some(s) = &o.src {
                    changed |= set_if_different(src, Some(s.clone()));
                }
            }
        }
        changed
    }

    /// Repair values a stored snapshot may carry but a live shape may not:
    /// non-finite positions move to `fallback`, bad extents and font sizes
    /// revert to the kind defaults, opacity and star points are clamped.
    ///
    /// Returns `true` if anything was repaired.
    pub fn normalize(&mut self, fallback: Point) -> bool {
        let mut changed = false;
        changed |= repair(&mut self.x, f64::is_finite, fallback.x);
        changed |= repair(&mut self.y, f64::is_finite, fallback.y);
        changed |= repair(&mut self.style.stroke_width, |v| v.is_finite() && v >= 0.0, DEFAULT_STROKE_WIDTH);
        changed |= repair(&mut self.style.opacity, f64::is_finite, DEFAULT_OPACITY);
        let clamped_opacity = self.style.opacity.clamp(0.0, 1.0);
        changed |= set_if_different(&mut self.style.opacity, clamped_opacity);

        let defaults = ShapeKind::default_for(self.shape_type());
        match (&mut self.kind, defaults) {
            (ShapeKind::Rect { w, h }, ShapeKind::Rect { w: dw, h: dh })
            | (ShapeKind::Triangle { w, h }, ShapeKind::Triangle { w: dw, h: dh })
            | (ShapeKind::Image { w, h, .. }, ShapeKind::Image { w: dw, h: dh, .. }) => {
                changed |= repair(w, is_extent, dw);
                changed |= repair(h, is_extent, dh);
            }
            (ShapeKind::Circle { r }, ShapeKind::Circle { r: dr }) => {
                changed |= repair(r, is_extent, dr);
            }
            (ShapeKind::Star { r, points }, ShapeKind::Star { r: dr, .. }) => {
                changed |= repair(r, is_extent, dr);
                changed |= set_if_different(points, (*points).clamp(MIN_STAR_POINTS, MAX_STAR_POINTS));
            }
            (ShapeKind::Text { font_size, .. }, _) => {
                changed |= repair(font_size, is_extent, DEFAULT_FONT_SIZE);
            }
            _ => {}
        }
        changed
    }

    /// Copy of this shape suitable for a snapshot: any decoded image is dropped.
    #[must_use]
    pub fn detached(&self) -> Self {
        let mut shape = self.clone();
        if let ShapeKind::Image { resource, .. } = &mut shape.kind {
            *resource = None;
        }
        shape
    }
}

fn is_extent(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn repair(slot: &mut f64, valid: impl Fn(f64) -> bool, default: f64) -> bool {
    if valid(*slot) {
        return false;
    }
    *slot = default;
    true
}

fn set_if_different<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn set_finite(slot: &mut f64, value: Option<f64>) -> bool {
    match value {
        Some(v) if v.is_finite() => set_if_different(slot, v),
        _ => false,
    }
}

fn set_positive(slot: &mut f64, value: Option<f64>) -> bool {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => set_if_different(slot, v),
        _ => false,
    }
}

/// Sparse update for a shape. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeOverrides {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
    /// Width, for rect, triangle and image.
    pub w: Option<f64>,
    /// Height, for rect, triangle and image.
    pub h: Option<f64>,
    /// Radius, for circle and star.
    pub r: Option<f64>,
    /// Spike count, for star.
    pub points: Option<u32>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub bold: Option<bool>,
    /// Image source, for image.
    pub src: Option<String>,
}

/// Serializable projection of a scene's shape sequence.
///
/// Image resources are dropped; they must be decoded again from `src`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub objects: Vec<Shape>,
}

/// Default scene width and height in scene units.
pub const DEFAULT_SCENE_SIZE: f64 = 800.0;

/// The editable state: ordered shapes, the selection, and the canvas size.
#[derive(Debug, Clone)]
pub struct Scene {
    shapes: Vec<Shape>,
    selected: Option<ShapeId>,
    width: f64,
    height: f64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_SCENE_SIZE, DEFAULT_SCENE_SIZE)
    }
}

impl Scene {
    /// An empty scene of the given fixed size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { shapes: Vec::new(), selected: None, width, height }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Shapes in paint order (bottom first).
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    #[must_use]
    pub fn index_of(&self, id: &ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| &s.id == id)
    }

    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| &s.id == id)
    }

    pub fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| &s.id == id)
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<&ShapeId> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Shape> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// Topmost shape under `pt`.
    #[must_use]
    pub fn shape_at(&self, pt: Point) -> Option<&Shape> {
        hit::topmost(&self.shapes, pt)
    }

    /// Create a shape with defaults for `shape_type`, apply `overrides`,
    /// append it on top, and select it.
    pub fn add_shape(&mut self, shape_type: ShapeType, overrides: &ShapeOverrides) -> &Shape {
        let mut id = ShapeId::generate();
        while self.index_of(&id).is_some() {
            id = ShapeId::generate();
        }
        let center = Point::new(self.width / 2.0, self.height / 2.0);
        let mut shape = Shape::new(id.clone(), shape_type, center);
        shape.apply(overrides);
        self.shapes.push(shape);
        self.selected = Some(id);
        let last = self.shapes.len() - 1;
        &self.shapes[last]
    }

    /// Set the selection. An id that is not in the scene clears it.
    ///
    /// Returns `true` if the selection changed.
    pub fn select(&mut self, id: Option<&ShapeId>) -> bool {
        let next = id.filter(|id| self.index_of(id).is_some()).cloned();
        set_if_different(&mut self.selected, next)
    }

    /// Remove a shape by id, clearing the selection if it pointed at it.
    pub fn remove(&mut self, id: &ShapeId) -> Option<Shape> {
        let idx = self.index_of(id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        Some(self.shapes.remove(idx))
    }

    /// Remove the selected shape. No-op without a selection.
    pub fn delete_selected(&mut self) -> Option<Shape> {
        let id = self.selected.clone()?;
        self.remove(&id)
    }

    /// Move the selected shape to the top of the stack, keeping the relative
    /// order of every other shape. Returns `true` if the order changed.
    pub fn bring_selected_to_front(&mut self) -> bool {
        let Some(idx) = self.selected.as_ref().and_then(|id| self.index_of(id)) else {
            return false;
        };
        if idx + 1 == self.shapes.len() {
            return false;
        }
        let shape = self.shapes.remove(idx);
        self.shapes.push(shape);
        true
    }

    /// Remove every shape and clear the selection.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.selected = None;
    }

    /// Apply a sparse update to one shape. Returns `false` if the shape does
    /// not exist or nothing changed.
    pub fn update(&mut self, id: &ShapeId, overrides: &ShapeOverrides) -> bool {
        self.get_mut(id).is_some_and(|shape| shape.apply(overrides))
    }

    /// Serializable copy of the shape sequence, without decoded images.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot { objects: self.shapes.iter().map(Shape::detached).collect() }
    }

    /// Replace all shapes with a snapshot and clear the selection.
    ///
    /// Later duplicates of an id already loaded are dropped. Invalid values
    /// are repaired with [`Shape::normalize`]; decoded images are not kept.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) {
        let mut seen = HashSet::with_capacity(snapshot.objects.len());
        let center = Point::new(self.width / 2.0, self.height / 2.0);
        self.shapes.clear();
        self.selected = None;
        for shape in snapshot.objects {
            if !seen.insert(shape.id.clone()) {
                warn!(id = %shape.id, "dropping shape with duplicate id from snapshot");
                continue;
            }
            let mut shape = shape.detached();
            if shape.normalize(center) {
                warn!(id = %shape.id, "repaired invalid values in snapshot shape");
            }
            self.shapes.push(shape);
        }
    }
}
