#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn scene() -> Scene {
    Scene::new(800.0, 800.0)
}

fn add(scene: &mut Scene, shape_type: ShapeType) -> ShapeId {
    scene.add_shape(shape_type, &ShapeOverrides::default()).id.clone()
}

fn ids(scene: &Scene) -> Vec<ShapeId> {
    scene.shapes().iter().map(|s| s.id.clone()).collect()
}

// =============================================================
// ShapeId
// =============================================================

#[test]
fn generated_ids_are_prefixed_and_unique() {
    let a = ShapeId::generate();
    let b = ShapeId::generate();
    assert!(a.as_str().starts_with("obj_"));
    assert_ne!(a, b);
}

#[test]
fn shape_id_serializes_as_plain_string() {
    let id = ShapeId::from("t1");
    assert_eq!(serde_json::to_value(&id).ok(), Some(json!("t1")));
    assert_eq!(id.to_string(), "t1");
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_extents_per_kind() {
    assert_eq!(ShapeKind::default_for(ShapeType::Rect), ShapeKind::Rect { w: 200.0, h: 120.0 });
    assert_eq!(ShapeKind::default_for(ShapeType::Circle), ShapeKind::Circle { r: 90.0 });
    assert_eq!(ShapeKind::default_for(ShapeType::Triangle), ShapeKind::Triangle { w: 180.0, h: 160.0 });
    assert_eq!(ShapeKind::default_for(ShapeType::Star), ShapeKind::Star { r: 90.0, points: 5 });
    assert_eq!(
        ShapeKind::default_for(ShapeType::Image),
        ShapeKind::Image { w: 200.0, h: 140.0, src: None, resource: None }
    );
}

#[test]
fn default_text_payload() {
    let ShapeKind::Text { text, font_size, font_family, bold } = ShapeKind::default_for(ShapeType::Text) else {
        panic!("expected text");
    };
    assert_eq!(text, "New Text");
    assert_eq!(font_size, 28.0);
    assert_eq!(font_family, "Arial");
    assert!(!bold);
}

#[test]
fn default_style() {
    let style = Style::default();
    assert_eq!(style.fill, "#FF6B6B");
    assert_eq!(style.stroke, "#0f172a");
    assert_eq!(style.stroke_width, 2.0);
    assert_eq!(style.opacity, 1.0);
}

#[test]
fn shape_type_round_trips_through_kind() {
    for t in [
        ShapeType::Rect,
        ShapeType::Circle,
        ShapeType::Triangle,
        ShapeType::Star,
        ShapeType::Text,
        ShapeType::Image,
    ] {
        assert_eq!(ShapeKind::default_for(t).shape_type(), t);
    }
}

// =============================================================
// Shape::apply
// =============================================================

fn shape(t: ShapeType) -> Shape {
    Shape::new(ShapeId::from("s"), t, Point::new(100.0, 100.0))
}

#[test]
fn apply_sets_common_fields() {
    let mut s = shape(ShapeType::Rect);
    let changed = s.apply(&ShapeOverrides {
        x: Some(10.0),
        fill: Some("#000000".into()),
        stroke_width: Some(0.0),
        ..ShapeOverrides::default()
    });
    assert!(changed);
    assert_eq!(s.x, 10.0);
    assert_eq!(s.y, 100.0);
    assert_eq!(s.style.fill, "#000000");
    assert_eq!(s.style.stroke_width, 0.0);
}

#[test]
fn apply_reports_no_change_for_identical_values() {
    let mut s = shape(ShapeType::Circle);
    assert!(!s.apply(&ShapeOverrides { r: Some(90.0), ..ShapeOverrides::default() }));
    assert!(!s.apply(&ShapeOverrides::default()));
}

#[test]
fn apply_ignores_fields_of_other_kinds() {
    let mut s = shape(ShapeType::Circle);
    assert!(!s.apply(&ShapeOverrides { w: Some(50.0), text: Some("x".into()), ..ShapeOverrides::default() }));
    assert_eq!(s.kind, ShapeKind::Circle { r: 90.0 });
}

#[test]
fn apply_rejects_degenerate_extents() {
    let mut s = shape(ShapeType::Rect);
    s.apply(&ShapeOverrides { w: Some(0.0), h: Some(-5.0), ..ShapeOverrides::default() });
    assert_eq!(s.kind, ShapeKind::Rect { w: 200.0, h: 120.0 });
    s.apply(&ShapeOverrides { w: Some(f64::NAN), x: Some(f64::INFINITY), ..ShapeOverrides::default() });
    assert_eq!(s.kind, ShapeKind::Rect { w: 200.0, h: 120.0 });
    assert_eq!(s.x, 100.0);
}

#[test]
fn apply_clamps_opacity() {
    let mut s = shape(ShapeType::Rect);
    s.apply(&ShapeOverrides { opacity: Some(3.0), ..ShapeOverrides::default() });
    assert_eq!(s.style.opacity, 1.0);
    s.apply(&ShapeOverrides { opacity: Some(-1.0), ..ShapeOverrides::default() });
    assert_eq!(s.style.opacity, 0.0);
}

#[test]
fn apply_enforces_minimum_star_points() {
    let mut s = shape(ShapeType::Star);
    s.apply(&ShapeOverrides { points: Some(1), ..ShapeOverrides::default() });
    assert_eq!(s.kind, ShapeKind::Star { r: 90.0, points: 3 });
}

#[test]
fn apply_text_fields() {
    let mut s = shape(ShapeType::Text);
    s.apply(&ShapeOverrides {
        text: Some("HELLO".into()),
        font_size: Some(56.0),
        font_family: Some("Helvetica".into()),
        bold: Some(true),
        ..ShapeOverrides::default()
    });
    assert_eq!(
        s.kind,
        ShapeKind::Text { text: "HELLO".into(), font_size: 56.0, font_family: "Helvetica".into(), bold: true }
    );
}

#[test]
fn apply_image_src() {
    let mut s = shape(ShapeType::Image);
    s.apply(&ShapeOverrides { src: Some("data:image/png;base64,AA".into()), ..ShapeOverrides::default() });
    let ShapeKind::Image { src, .. } = &s.kind else {
        panic!("expected image");
    };
    assert_eq!(src.as_deref(), Some("data:image/png;base64,AA"));
}

// =============================================================
// Scene operations
// =============================================================

#[test]
fn add_shape_centers_appends_and_selects() {
    let mut sc = scene();
    let a = add(&mut sc, ShapeType::Rect);
    let b = add(&mut sc, ShapeType::Circle);
    assert_eq!(ids(&sc), vec![a, b.clone()]);
    assert_eq!(sc.selected_id(), Some(&b));
    let circle = sc.get(&b).map(Shape::center);
    assert_eq!(circle, Some(Point::new(400.0, 400.0)));
}

#[test]
fn add_shape_applies_overrides() {
    let mut sc = scene();
    let s = sc.add_shape(ShapeType::Rect, &ShapeOverrides { x: Some(10.0), w: Some(30.0), ..ShapeOverrides::default() });
    assert_eq!(s.x, 10.0);
    assert_eq!(s.kind, ShapeKind::Rect { w: 30.0, h: 120.0 });
}

#[test]
fn select_unknown_id_clears_selection() {
    let mut sc = scene();
    add(&mut sc, ShapeType::Rect);
    assert!(sc.select(Some(&ShapeId::from("ghost"))));
    assert_eq!(sc.selected_id(), None);
    assert!(!sc.select(None));
}

#[test]
fn delete_selected_removes_and_clears() {
    let mut sc = scene();
    let a = add(&mut sc, ShapeType::Rect);
    let removed = sc.delete_selected().map(|s| s.id);
    assert_eq!(removed, Some(a));
    assert!(sc.is_empty());
    assert_eq!(sc.selected_id(), None);
    assert!(sc.delete_selected().is_none());
}

#[test]
fn remove_other_shape_keeps_selection() {
    let mut sc = scene();
    let a = add(&mut sc, ShapeType::Rect);
    let b = add(&mut sc, ShapeType::Circle);
    assert!(sc.remove(&a).is_some());
    assert_eq!(sc.selected_id(), Some(&b));
}

#[test]
fn bring_to_front_preserves_relative_order() {
    let mut sc = scene();
    let a = add(&mut sc, ShapeType::Rect);
    let b = add(&mut sc, ShapeType::Circle);
    let c = add(&mut sc, ShapeType::Star);
    sc.select(Some(&a));
    assert!(sc.bring_selected_to_front());
    assert_eq!(ids(&sc), vec![b, c, a.clone()]);
    // Already on top.
    assert!(!sc.bring_selected_to_front());
    assert_eq!(sc.selected_id(), Some(&a));
}

#[test]
fn bring_to_front_without_selection_is_no_op() {
    let mut sc = scene();
    add(&mut sc, ShapeType::Rect);
    sc.select(None);
    assert!(!sc.bring_selected_to_front());
}

#[test]
fn clear_empties_scene() {
    let mut sc = scene();
    add(&mut sc, ShapeType::Rect);
    add(&mut sc, ShapeType::Text);
    sc.clear();
    assert!(sc.is_empty());
    assert_eq!(sc.selected_id(), None);
}

#[test]
fn update_missing_shape_returns_false() {
    let mut sc = scene();
    assert!(!sc.update(&ShapeId::from("nope"), &ShapeOverrides { x: Some(1.0), ..ShapeOverrides::default() }));
}

#[test]
fn shape_at_prefers_topmost() {
    let mut sc = scene();
    add(&mut sc, ShapeType::Rect);
    let top = add(&mut sc, ShapeType::Circle);
    assert_eq!(sc.shape_at(Point::new(400.0, 400.0)).map(|s| s.id.clone()), Some(top));
    assert!(sc.shape_at(Point::new(5.0, 5.0)).is_none());
}

// =============================================================
// Snapshots
// =============================================================

#[test]
fn snapshot_json_shape() {
    let mut sc = scene();
    sc.load_snapshot(Snapshot {
        objects: vec![Shape::new(ShapeId::from("c1"), ShapeType::Circle, Point::new(1.0, 2.0))],
    });
    let value = serde_json::to_value(sc.snapshot()).ok();
    assert_eq!(
        value,
        Some(json!({
            "objects": [{
                "id": "c1",
                "x": 1.0,
                "y": 2.0,
                "fill": "#FF6B6B",
                "stroke": "#0f172a",
                "strokeWidth": 2.0,
                "opacity": 1.0,
                "type": "circle",
                "r": 90.0
            }]
        }))
    );
}

#[test]
fn snapshot_parses_with_missing_style_fields() {
    let raw = json!({
        "objects": [
            { "id": "t", "type": "text", "x": 5, "y": 6, "text": "hi", "fontSize": 40 },
            { "id": "s", "type": "star", "x": 0, "y": 0, "r": 10 }
        ]
    });
    let snap: Snapshot = match serde_json::from_value(raw) {
        Ok(s) => s,
        Err(e) => panic!("parse: {e}"),
    };
    assert_eq!(snap.objects.len(), 2);
    assert_eq!(snap.objects[0].style, Style::default());
    assert_eq!(
        snap.objects[0].kind,
        ShapeKind::Text { text: "hi".into(), font_size: 40.0, font_family: "Arial".into(), bold: false }
    );
    assert_eq!(snap.objects[1].kind, ShapeKind::Star { r: 10.0, points: 5 });
}

#[test]
fn snapshot_rejects_unknown_type() {
    let raw = json!({ "objects": [{ "id": "x", "type": "hexagon", "x": 0, "y": 0 }] });
    assert!(serde_json::from_value::<Snapshot>(raw).is_err());
}

#[test]
fn empty_object_parses_as_empty_snapshot() {
    let snap: Result<Snapshot, _> = serde_json::from_value(json!({}));
    assert!(snap.is_ok_and(|s| s.objects.is_empty()));
}

#[test]
fn load_snapshot_clears_selection_and_drops_duplicates() {
    let mut sc = scene();
    add(&mut sc, ShapeType::Rect);
    let mut first = Shape::new(ShapeId::from("dup"), ShapeType::Rect, Point::new(0.0, 0.0));
    first.style.fill = "#000000".into();
    let second = Shape::new(ShapeId::from("dup"), ShapeType::Circle, Point::new(0.0, 0.0));
    sc.load_snapshot(Snapshot { objects: vec![first, second] });
    assert_eq!(sc.len(), 1);
    assert_eq!(sc.shapes()[0].style.fill, "#000000");
    assert_eq!(sc.selected_id(), None);
}

#[test]
fn image_resource_is_not_serialized() {
    let mut s = shape(ShapeType::Image);
    let pixels = vec![0u8; 4];
    if let (ShapeKind::Image { resource, .. }, Ok(img)) = (&mut s.kind, crate::surface::ImageData::new(1, 1, pixels)) {
        *resource = Some(std::sync::Arc::new(img));
    }
    assert!(s.image_resource().is_some());
    let value = serde_json::to_value(&s).ok();
    assert!(value.as_ref().is_some_and(|v| v.get("resource").is_none()));
    let back: Option<Shape> = value.and_then(|v| serde_json::from_value(v).ok());
    assert!(back.is_some_and(|b| b.image_resource().is_none()));
}

fn with_resource(mut s: Shape) -> Shape {
    if let (ShapeKind::Image { resource, .. }, Ok(img)) = (&mut s.kind, crate::surface::ImageData::new(1, 1, vec![0u8; 4])) {
        *resource = Some(std::sync::Arc::new(img));
    }
    s
}

#[test]
fn snapshot_drops_decoded_images() {
    let mut sc = scene();
    let id = add(&mut sc, ShapeType::Image);
    if let Some(s) = sc.get_mut(&id) {
        *s = with_resource(s.clone());
    }
    assert!(sc.get(&id).is_some_and(|s| s.image_resource().is_some()));
    let snap = sc.snapshot();
    assert!(snap.objects[0].image_resource().is_none());
    // The live scene keeps its pixels.
    assert!(sc.get(&id).is_some_and(|s| s.image_resource().is_some()));
}

#[test]
fn load_snapshot_drops_decoded_images() {
    let mut sc = scene();
    let img = with_resource(Shape::new(ShapeId::from("img"), ShapeType::Image, Point::new(0.0, 0.0)));
    sc.load_snapshot(Snapshot { objects: vec![img] });
    assert!(sc.shapes()[0].image_resource().is_none());
}

#[test]
fn load_snapshot_repairs_invalid_values() {
    let raw = json!({
        "objects": [
            { "id": "s", "type": "star", "x": 10, "y": 20, "r": -5, "points": 0, "opacity": 7 },
            { "id": "b", "type": "star", "x": 0, "y": 0, "r": 10, "points": 4_000_000_000u32 },
            { "id": "r", "type": "rect", "x": 0, "y": 0, "w": 0, "h": -1, "strokeWidth": -3, "opacity": -1 },
            { "id": "t", "type": "text", "x": 0, "y": 0, "text": "hi", "fontSize": 0 }
        ]
    });
    let snap: Snapshot = match serde_json::from_value(raw) {
        Ok(s) => s,
        Err(e) => panic!("parse: {e}"),
    };
    let mut sc = scene();
    sc.load_snapshot(snap);
    let shapes = sc.shapes();
    assert_eq!(shapes[0].kind, ShapeKind::Star { r: 90.0, points: MIN_STAR_POINTS });
    assert_eq!(shapes[0].style.opacity, 1.0);
    assert_eq!((shapes[0].x, shapes[0].y), (10.0, 20.0));
    assert_eq!(shapes[1].kind, ShapeKind::Star { r: 10.0, points: MAX_STAR_POINTS });
    assert_eq!(shapes[2].kind, ShapeKind::Rect { w: 200.0, h: 120.0 });
    assert_eq!(shapes[2].style.stroke_width, DEFAULT_STROKE_WIDTH);
    assert_eq!(shapes[2].style.opacity, 0.0);
    assert!(matches!(shapes[3].kind, ShapeKind::Text { font_size, .. } if font_size == DEFAULT_FONT_SIZE));
}

#[test]
fn normalize_moves_non_finite_position_to_fallback() {
    let mut s = Shape::new(ShapeId::from("n"), ShapeType::Circle, Point::new(f64::NAN, 3.0));
    assert!(s.normalize(Point::new(400.0, 400.0)));
    assert_eq!((s.x, s.y), (400.0, 3.0));
    assert!(!s.normalize(Point::new(0.0, 0.0)));
}

#[test]
fn every_kind_survives_json_and_reload() {
    let mut sc = scene();
    let kinds = [
        (ShapeType::Rect, ShapeOverrides { w: Some(50.0), fill: Some("#112233".into()), ..ShapeOverrides::default() }),
        (ShapeType::Circle, ShapeOverrides { r: Some(33.5), opacity: Some(0.4), ..ShapeOverrides::default() }),
        (ShapeType::Triangle, ShapeOverrides { x: Some(10.0), y: Some(700.0), ..ShapeOverrides::default() }),
        (ShapeType::Star, ShapeOverrides { points: Some(8), stroke_width: Some(0.0), ..ShapeOverrides::default() }),
        (
            ShapeType::Text,
            ShapeOverrides {
                text: Some("two\nlines".into()),
                bold: Some(true),
                font_family: Some("Helvetica".into()),
                ..ShapeOverrides::default()
            },
        ),
        (ShapeType::Image, ShapeOverrides { src: Some("logo.png".into()), ..ShapeOverrides::default() }),
    ];
    for (shape_type, overrides) in &kinds {
        sc.add_shape(*shape_type, overrides);
    }
    let before = sc.snapshot();

    let text = match serde_json::to_string(&before) {
        Ok(t) => t,
        Err(e) => panic!("serialize: {e}"),
    };
    let parsed: Snapshot = match serde_json::from_str(&text) {
        Ok(s) => s,
        Err(e) => panic!("parse: {e}"),
    };
    assert_eq!(parsed, before);

    let mut reloaded = scene();
    reloaded.load_snapshot(parsed);
    assert_eq!(reloaded.snapshot(), before);
    assert_eq!(ids(&reloaded), ids(&sc));
    assert_eq!(reloaded.selected_id(), None);
}
