use super::*;
use crate::doc::{Scene, ShapeType};

#[test]
fn round_badge_is_circle_under_text() {
    let snap = Template::RoundBadge.snapshot();
    let types: Vec<ShapeType> = snap.objects.iter().map(Shape::shape_type).collect();
    assert_eq!(types, vec![ShapeType::Circle, ShapeType::Text]);
}

#[test]
fn round_badge_ids_are_unique() {
    let snap = Template::RoundBadge.snapshot();
    assert_ne!(snap.objects[0].id, snap.objects[1].id);
}

#[test]
fn round_badge_loads_into_scene_unselected() {
    let mut scene = Scene::default();
    scene.load_snapshot(Template::RoundBadge.snapshot());
    assert_eq!(scene.len(), 2);
    assert!(scene.selected_id().is_none());
}

#[test]
fn template_serde_name() {
    assert_eq!(serde_json::to_string(&Template::RoundBadge).unwrap(), "\"roundBadge\"");
}
