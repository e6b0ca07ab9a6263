//! Geometry: hit-testing, resize-handle anchors, and selection outlines.
//!
//! Everything here is a pure function of a shape and a point. The same
//! anchor is used to draw the resize handle, to pick it, and to place the
//! floating delete control, so the three can never disagree.
//!
//! Hit envelopes are deliberately approximate: stars use their outer circle,
//! text uses a box estimated from character count and font size.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::consts::{HANDLE_PICK_RADIUS, SELECTION_RING_GAP, TEXT_BOX_PAD, TEXT_HEIGHT_FACTOR, TEXT_WIDTH_FACTOR};
use crate::doc::{Scene, Shape, ShapeId, ShapeKind};
use crate::surface::Rect;

/// Which part of a shape was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle,
}

/// Result of a whole-scene hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub shape_id: ShapeId,
    pub part: HitPart,
}

/// Dashed selection outline geometry for a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outline {
    Box(Rect),
    Ring { center: Point, radius: f64 },
    Triangle([Point; 3]),
}

/// Approximate `(width, height)` of a text block, before padding.
///
/// Width counts UTF-16 code units, so an astral character counts twice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn text_extent(text: &str, font_size: f64) -> (f64, f64) {
    let w = text.encode_utf16().count() as f64 * font_size * TEXT_WIDTH_FACTOR;
    let h = font_size * TEXT_HEIGHT_FACTOR;
    (w, h)
}

/// Padded hit box of a text block centered on `center`.
#[must_use]
pub fn text_box(center: Point, text: &str, font_size: f64) -> Rect {
    let (w, h) = text_extent(text, font_size);
    Rect::centered(center, w + TEXT_BOX_PAD * 2.0, h + TEXT_BOX_PAD * 2.0)
}

/// Vertices of the apex-up triangle: apex, bottom-left, bottom-right.
#[must_use]
pub fn triangle_vertices(center: Point, w: f64, h: f64) -> [Point; 3] {
    [
        Point::new(center.x, center.y - h / 2.0),
        Point::new(center.x - w / 2.0, center.y + h / 2.0),
        Point::new(center.x + w / 2.0, center.y + h / 2.0),
    ]
}

/// Barycentric point-in-triangle test. Points on an edge are outside.
#[must_use]
pub fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let area = 0.5 * (-b.y * c.x + a.y * (-b.x + c.x) + a.x * (b.y - c.y) + b.x * c.y);
    if area == 0.0 {
        return false;
    }
    let k = 1.0 / (2.0 * area);
    let s = k * (a.y * c.x - a.x * c.y + (c.y - a.y) * p.x + (a.x - c.x) * p.y);
    let t = k * (a.x * b.y - a.y * b.x + (a.y - b.y) * p.x + (b.x - a.x) * p.y);
    s > 0.0 && t > 0.0 && s + t < 1.0
}

/// Whether `pt` lies inside `shape`'s hit envelope.
#[must_use]
pub fn hit_test(shape: &Shape, pt: Point) -> bool {
    let center = shape.center();
    match &shape.kind {
        ShapeKind::Rect { w, h } | ShapeKind::Image { w, h, .. } => Rect::centered(center, *w, *h).contains(pt),
        ShapeKind::Circle { r } | ShapeKind::Star { r, .. } => center.distance(pt) <= *r,
        ShapeKind::Triangle { w, h } => {
            let [a, b, c] = triangle_vertices(center, *w, *h);
            point_in_triangle(pt, a, b, c)
        }
        ShapeKind::Text { text, font_size, .. } => text_box(center, text, *font_size).contains(pt),
    }
}

/// The point where the resize handle is drawn and picked.
#[must_use]
pub fn handle_anchor(shape: &Shape) -> Point {
    let center = shape.center();
    match &shape.kind {
        ShapeKind::Rect { w, h } | ShapeKind::Triangle { w, h } | ShapeKind::Image { w, h, .. } => {
            Point::new(center.x + w / 2.0, center.y + h / 2.0)
        }
        ShapeKind::Circle { r } | ShapeKind::Star { r, .. } => Point::new(center.x + r, center.y + r),
        ShapeKind::Text { text, font_size, .. } => text_box(center, text, *font_size).bottom_right(),
    }
}

/// Whether `pt` is close enough to the handle anchor to grab it.
#[must_use]
pub fn is_over_handle(shape: &Shape, pt: Point) -> bool {
    handle_anchor(shape).distance(pt) < HANDLE_PICK_RADIUS
}

/// Selection outline geometry for `shape`.
#[must_use]
pub fn selection_outline(shape: &Shape) -> Outline {
    let center = shape.center();
    match &shape.kind {
        ShapeKind::Rect { w, h } | ShapeKind::Image { w, h, .. } => Outline::Box(Rect::centered(center, *w, *h)),
        ShapeKind::Circle { r } | ShapeKind::Star { r, .. } => Outline::Ring { center, radius: r + SELECTION_RING_GAP },
        ShapeKind::Triangle { w, h } => Outline::Triangle(triangle_vertices(center, *w, *h)),
        ShapeKind::Text { text, font_size, .. } => Outline::Box(text_box(center, text, *font_size)),
    }
}

/// Topmost shape in `shapes` (paint order) whose envelope contains `pt`.
#[must_use]
pub fn topmost(shapes: &[Shape], pt: Point) -> Option<&Shape> {
    shapes.iter().rev().find(|s| hit_test(s, pt))
}

/// Whole-scene hit test.
///
/// The topmost shape under `pt` wins, and the part is its handle if `pt` is
/// over it. Only when no body is hit does the selected shape's handle count:
/// a circle or star handle sits outside its body.
#[must_use]
pub fn hit_scene(scene: &Scene, pt: Point) -> Option<Hit> {
    if let Some(shape) = scene.shape_at(pt) {
        let part = if is_over_handle(shape, pt) { HitPart::ResizeHandle } else { HitPart::Body };
        return Some(Hit { shape_id: shape.id.clone(), part });
    }
    let selected = scene.selected().filter(|s| is_over_handle(s, pt))?;
    Some(Hit { shape_id: selected.id.clone(), part: HitPart::ResizeHandle })
}
