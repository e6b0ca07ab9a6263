//! Rendering: paints a scene onto a [`Surface`].
//!
//! This module is the only place that decides what pixels a scene produces.
//! It receives a read-only view of the scene and issues path, text, and image
//! calls to the target; it does not mutate any application state. The same
//! functions drive the on-screen frame and the off-screen export, which only
//! differ in target and in whether the selection overlay is drawn.
//!
//! All fallible surface calls propagate errors via `Result<(), S::Error>`.
//! The top-level caller ([`crate::engine::EngineCore::render`]) handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::{FRAC_PI_2, PI};

use crate::camera::{Point, Viewport};
use crate::color::{self, Rgba};
use crate::consts::{
    DELETE_BUTTON_OFFSET_X, DELETE_BUTTON_OFFSET_Y, HANDLE_HALF_SIZE, SELECTION_DASH, SELECTION_LINE_WIDTH,
    STAR_INNER_DIVISOR, TEXT_LINE_HEIGHT,
};
use crate::doc::{Scene, Shape, ShapeKind};
use crate::hit::{self, Outline};
use crate::surface::{FontSpec, Path, Rect, StrokeStyle, Surface};

/// Fill used when a shape's fill does not parse.
const FALLBACK_FILL: Rgba = Rgba::opaque(0xFF, 0x6B, 0x6B);
/// Text fill used when a text shape's fill does not parse.
const FALLBACK_TEXT_FILL: Rgba = Rgba::opaque(0x11, 0x18, 0x27);
/// Selection outline and handle border.
const SELECTION_COLOR: Rgba = Rgba::opaque(0x4f, 0x46, 0xe5);

/// Draw the full frame: background, shapes, and the selection overlay.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw<S: Surface>(surface: &mut S, scene: &Scene) -> Result<(), S::Error> {
    paint_shapes(surface, scene)?;
    if let Some(selected) = scene.selected() {
        draw_selection(surface, selected)?;
    }
    surface.present()
}

/// Draw background and shapes only. Used for export.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw_shapes<S: Surface>(surface: &mut S, scene: &Scene) -> Result<(), S::Error> {
    paint_shapes(surface, scene)?;
    surface.present()
}

fn paint_shapes<S: Surface>(surface: &mut S, scene: &Scene) -> Result<(), S::Error> {
    // Layer 1: clear and paint the white card.
    surface.clear()?;
    surface.fill_path(&Path::rect(0.0, 0.0, scene.width(), scene.height()), Rgba::WHITE)?;

    // Layer 2: shapes in sequence order (bottom first).
    for shape in scene.shapes() {
        draw_shape(surface, shape)?;
    }
    Ok(())
}

// =============================================================
// Shape dispatch
// =============================================================

fn draw_shape<S: Surface>(surface: &mut S, shape: &Shape) -> Result<(), S::Error> {
    let alpha = opacity(shape);
    match &shape.kind {
        ShapeKind::Rect { w, h } => {
            let rect = Rect::new(js_round(shape.x - w / 2.0), js_round(shape.y - h / 2.0), js_round(*w), js_round(*h));
            fill_and_stroke(surface, shape, &rect.to_path(), alpha)
        }
        ShapeKind::Circle { r } => {
            let path = Path::circle(Point::new(js_round(shape.x), js_round(shape.y)), js_round(*r));
            fill_and_stroke(surface, shape, &path, alpha)
        }
        ShapeKind::Triangle { w, h } => {
            let path = Path::polygon(&hit::triangle_vertices(shape.center(), *w, *h));
            fill_and_stroke(surface, shape, &path, alpha)
        }
        ShapeKind::Star { r, points } => {
            let path = Path::polygon(&star_vertices(shape.center(), *r, *points));
            fill_and_stroke(surface, shape, &path, alpha)
        }
        ShapeKind::Text { text, font_size, font_family, bold } => {
            let font = FontSpec { family: font_family.clone(), size: *font_size, bold: *bold };
            let color = color::parse_or(&shape.style.fill, FALLBACK_TEXT_FILL).with_alpha(alpha);
            draw_text(surface, text, shape.center(), &font, color)
        }
        ShapeKind::Image { w, h, resource, .. } => {
            // Still decoding (or failed): occupies its box but paints nothing.
            let Some(image) = resource else {
                return Ok(());
            };
            let dest = Rect::new(js_round(shape.x - w / 2.0), js_round(shape.y - h / 2.0), js_round(*w), js_round(*h));
            surface.draw_image(image, dest, alpha)
        }
    }
}

fn fill_and_stroke<S: Surface>(surface: &mut S, shape: &Shape, path: &Path, alpha: f64) -> Result<(), S::Error> {
    surface.fill_path(path, color::parse_or(&shape.style.fill, FALLBACK_FILL).with_alpha(alpha))?;
    if shape.style.stroke_width > 0.0 {
        let stroke = StrokeStyle {
            color: color::parse_or(&shape.style.stroke, Rgba::BLACK).with_alpha(alpha),
            width: shape.style.stroke_width,
            dash: None,
        };
        surface.stroke_path(path, &stroke)?;
    }
    Ok(())
}

fn opacity(shape: &Shape) -> f64 {
    let o = shape.style.opacity;
    if o.is_finite() { o.clamp(0.0, 1.0) } else { 1.0 }
}

/// Round half up, the way the browser rounds canvas coordinates.
fn js_round(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Outline vertices of a star: alternating outer and inner points, the
/// first spike pointing straight up.
#[must_use]
pub fn star_vertices(center: Point, r: f64, spikes: u32) -> Vec<Point> {
    let inner = r / STAR_INNER_DIVISOR;
    let n = f64::from(spikes);
    let mut out = Vec::with_capacity(spikes as usize * 2);
    for i in 0..spikes {
        let a = f64::from(i) * PI * 2.0 / n - FRAC_PI_2;
        out.push(Point::new(center.x + a.cos() * r, center.y + a.sin() * r));
        let a2 = a + PI / n;
        out.push(Point::new(center.x + a2.cos() * inner, center.y + a2.sin() * inner));
    }
    out
}

// =============================================================
// Text
// =============================================================

/// Vertical centers of each line of a text block centered on `center_y`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn line_centers(center_y: f64, line_count: usize, font_size: f64) -> Vec<f64> {
    let line_height = font_size * TEXT_LINE_HEIGHT;
    let start = center_y - line_count.saturating_sub(1) as f64 * line_height / 2.0;
    (0..line_count).map(|i| start + i as f64 * line_height).collect()
}

fn draw_text<S: Surface>(surface: &mut S, text: &str, center: Point, font: &FontSpec, color: Rgba) -> Result<(), S::Error> {
    let lines: Vec<&str> = text.split('\n').collect();
    for (line, y) in lines.iter().zip(line_centers(center.y, lines.len(), font.size)) {
        surface.fill_text(line, Point::new(center.x, y), font, color)?;
    }
    Ok(())
}

// =============================================================
// Selection UI
// =============================================================

fn draw_selection<S: Surface>(surface: &mut S, shape: &Shape) -> Result<(), S::Error> {
    let dashed = StrokeStyle {
        color: SELECTION_COLOR,
        width: SELECTION_LINE_WIDTH,
        dash: Some([SELECTION_DASH, SELECTION_DASH]),
    };
    let outline = match hit::selection_outline(shape) {
        Outline::Box(rect) => rect.to_path(),
        Outline::Ring { center, radius } => Path::circle(center, radius),
        Outline::Triangle(vertices) => Path::polygon(&vertices),
    };
    surface.stroke_path(&outline, &dashed)?;

    let handle = Rect::centered(hit::handle_anchor(shape), HANDLE_HALF_SIZE * 2.0, HANDLE_HALF_SIZE * 2.0).to_path();
    surface.fill_path(&handle, Rgba::WHITE)?;
    surface.stroke_path(&handle, &StrokeStyle { dash: None, ..dashed })
}

// =============================================================
// Overlay placement
// =============================================================

/// Client-space position of the floating delete control for the current
/// selection, or `None` when nothing is selected.
#[must_use]
pub fn delete_button_position(scene: &Scene, viewport: &Viewport) -> Option<Point> {
    let selected = scene.selected()?;
    let anchor = viewport.scene_to_client(hit::handle_anchor(selected));
    Some(Point::new(
        js_round(anchor.x + DELETE_BUTTON_OFFSET_X),
        js_round(anchor.y + DELETE_BUTTON_OFFSET_Y),
    ))
}
