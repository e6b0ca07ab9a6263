#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{ShapeOverrides, ShapeType};

fn at(t: ShapeType, x: f64, y: f64) -> Shape {
    Shape::new(ShapeId::from("s"), t, Point::new(x, y))
}

fn text(content: &str, font_size: f64) -> Shape {
    let mut s = at(ShapeType::Text, 0.0, 0.0);
    s.apply(&ShapeOverrides { text: Some(content.into()), font_size: Some(font_size), ..ShapeOverrides::default() });
    s
}

// =============================================================
// Envelopes
// =============================================================

#[test]
fn rect_contains_edges() {
    let r = at(ShapeType::Rect, 0.0, 0.0);
    assert!(hit_test(&r, Point::new(100.0, 60.0)));
    assert!(hit_test(&r, Point::new(-100.0, -60.0)));
    assert!(!hit_test(&r, Point::new(100.5, 0.0)));
}

#[test]
fn circle_is_inclusive_at_radius() {
    let c = at(ShapeType::Circle, 0.0, 0.0);
    assert!(hit_test(&c, Point::new(90.0, 0.0)));
    assert!(!hit_test(&c, Point::new(64.0, 64.0)));
}

#[test]
fn star_uses_outer_circle() {
    let s = at(ShapeType::Star, 0.0, 0.0);
    // Between two spikes, outside the drawn outline but inside r.
    assert!(hit_test(&s, Point::new(0.0, 80.0)));
    assert!(!hit_test(&s, Point::new(0.0, 91.0)));
}

#[test]
fn triangle_excludes_edges_and_corners() {
    let t = at(ShapeType::Triangle, 0.0, 0.0);
    assert!(hit_test(&t, Point::new(0.0, 0.0)));
    // Apex and base edge.
    assert!(!hit_test(&t, Point::new(0.0, -80.0)));
    assert!(!hit_test(&t, Point::new(0.0, 80.0)));
    // Beside the slanted edge.
    assert!(!hit_test(&t, Point::new(80.0, -60.0)));
}

#[test]
fn degenerate_triangle_never_hits() {
    let a = Point::new(0.0, 0.0);
    assert!(!point_in_triangle(a, a, Point::new(1.0, 1.0), Point::new(2.0, 2.0)));
}

#[test]
fn text_extent_counts_characters() {
    assert_eq!(text_extent("HELLO", 56.0), (140.0, 56.0 * 1.3));
    // Multi-byte characters count once.
    assert_eq!(text_extent("héé", 10.0).0, 15.0);
}

#[test]
fn text_extent_counts_astral_characters_twice() {
    assert_eq!(text_extent("\u{1F600}", 10.0).0, 10.0);
    assert_eq!(text_extent("a\u{1F600}", 10.0).0, 15.0);
}

#[test]
fn text_box_is_padded() {
    let b = text_box(Point::new(0.0, 0.0), "ab", 10.0);
    assert_eq!(b, Rect::centered(Point::new(0.0, 0.0), 26.0, 29.0));
}

#[test]
fn text_hit_uses_padded_box() {
    let t = text("ab", 10.0);
    assert!(hit_test(&t, Point::new(13.0, 0.0)));
    assert!(!hit_test(&t, Point::new(13.5, 0.0)));
}

// =============================================================
// Handles and outlines
// =============================================================

#[test]
fn handle_anchor_per_kind() {
    assert_eq!(handle_anchor(&at(ShapeType::Rect, 0.0, 0.0)), Point::new(100.0, 60.0));
    assert_eq!(handle_anchor(&at(ShapeType::Triangle, 0.0, 0.0)), Point::new(90.0, 80.0));
    assert_eq!(handle_anchor(&at(ShapeType::Image, 0.0, 0.0)), Point::new(100.0, 70.0));
    assert_eq!(handle_anchor(&at(ShapeType::Circle, 10.0, 10.0)), Point::new(100.0, 100.0));
    assert_eq!(handle_anchor(&at(ShapeType::Star, 0.0, 0.0)), Point::new(90.0, 90.0));
    assert_eq!(handle_anchor(&text("ab", 10.0)), Point::new(13.0, 14.5));
}

#[test]
fn handle_pick_radius_is_exclusive() {
    let r = at(ShapeType::Rect, 0.0, 0.0);
    assert!(is_over_handle(&r, Point::new(117.9, 60.0)));
    assert!(!is_over_handle(&r, Point::new(118.0, 60.0)));
}

#[test]
fn selection_outline_per_kind() {
    let c = at(ShapeType::Circle, 0.0, 0.0);
    assert_eq!(selection_outline(&c), Outline::Ring { center: Point::new(0.0, 0.0), radius: 96.0 });
    let r = at(ShapeType::Rect, 0.0, 0.0);
    assert_eq!(selection_outline(&r), Outline::Box(Rect::new(-100.0, -60.0, 200.0, 120.0)));
    let t = at(ShapeType::Triangle, 0.0, 0.0);
    assert_eq!(selection_outline(&t), Outline::Triangle(triangle_vertices(Point::new(0.0, 0.0), 180.0, 160.0)));
}

// =============================================================
// Scene picking
// =============================================================

#[test]
fn topmost_prefers_last_in_sequence() {
    let mut bottom = at(ShapeType::Rect, 0.0, 0.0);
    bottom.id = ShapeId::from("bottom");
    let mut top = at(ShapeType::Circle, 0.0, 0.0);
    top.id = ShapeId::from("top");
    let shapes = vec![bottom, top];
    assert_eq!(topmost(&shapes, Point::new(0.0, 0.0)).map(|s| s.id.as_str()), Some("top"));
    // Only the rect covers its corner.
    assert_eq!(topmost(&shapes, Point::new(95.0, 55.0)).map(|s| s.id.as_str()), Some("bottom"));
}

#[test]
fn hit_scene_reaches_circle_handle_outside_body() {
    let mut scene = Scene::new(800.0, 800.0);
    let id = scene.add_shape(ShapeType::Circle, &ShapeOverrides::default()).id.clone();
    let hit = hit_scene(&scene, Point::new(490.0, 490.0));
    assert_eq!(hit, Some(Hit { shape_id: id, part: HitPart::ResizeHandle }));
}

#[test]
fn hit_scene_ignores_unselected_handle_outside_body() {
    let mut scene = Scene::new(800.0, 800.0);
    scene.add_shape(ShapeType::Circle, &ShapeOverrides::default());
    scene.select(None);
    assert_eq!(hit_scene(&scene, Point::new(490.0, 490.0)), None);
}

#[test]
fn hit_scene_body_and_inner_handle() {
    let mut scene = Scene::new(800.0, 800.0);
    let id = scene.add_shape(ShapeType::Rect, &ShapeOverrides::default()).id.clone();
    scene.select(None);
    assert_eq!(
        hit_scene(&scene, Point::new(400.0, 400.0)),
        Some(Hit { shape_id: id.clone(), part: HitPart::Body })
    );
    // Inside the body and within pick range of the corner.
    assert_eq!(
        hit_scene(&scene, Point::new(495.0, 455.0)),
        Some(Hit { shape_id: id, part: HitPart::ResizeHandle })
    );
}

#[test]
fn hit_scene_prefers_covering_shape_over_selected_handle() {
    let mut scene = Scene::new(800.0, 800.0);
    let below = scene.add_shape(ShapeType::Rect, &ShapeOverrides::default()).id.clone();
    let cover = ShapeOverrides { x: Some(500.0), y: Some(460.0), w: Some(100.0), h: Some(100.0), ..ShapeOverrides::default() };
    let above = scene.add_shape(ShapeType::Rect, &cover).id.clone();
    scene.select(Some(&below));
    // (500, 460) is the lower shape's handle anchor and the upper shape's center.
    assert_eq!(
        hit_scene(&scene, Point::new(500.0, 460.0)),
        Some(Hit { shape_id: above, part: HitPart::Body })
    );
}

#[test]
fn hit_scene_misses_empty_area() {
    let scene = Scene::new(800.0, 800.0);
    assert_eq!(hit_scene(&scene, Point::new(1.0, 1.0)), None);
}
