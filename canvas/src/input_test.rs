use super::*;

// =============================================================
// Key
// =============================================================

#[test]
fn key_delete_and_backspace_are_delete() {
    assert!(Key::new("Delete").is_delete());
    assert!(Key::new("Backspace").is_delete());
}

#[test]
fn key_other_names_are_not_delete() {
    assert!(!Key::new("Escape").is_delete());
    assert!(!Key::new("delete").is_delete());
    assert!(!Key::new("").is_delete());
}

#[test]
fn key_equality() {
    assert_eq!(Key::new("a"), Key("a".into()));
    assert_ne!(Key::new("a"), Key::new("b"));
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert_eq!(InputState::default(), InputState::Idle);
}

#[test]
fn idle_has_no_target() {
    assert!(InputState::Idle.target().is_none());
}

#[test]
fn dragging_and_resizing_expose_target() {
    let id = ShapeId::from("obj_a");
    let drag = InputState::Dragging { id: id.clone(), grab_offset: Point::new(1.0, 2.0) };
    let resize = InputState::Resizing { id: id.clone() };
    assert_eq!(drag.target(), Some(&id));
    assert_eq!(resize.target(), Some(&id));
}

#[test]
fn input_state_debug_names_variant() {
    let s = format!("{:?}", InputState::Resizing { id: ShapeId::from("x") });
    assert!(s.contains("Resizing"));
}

// =============================================================
// InputEvent
// =============================================================

#[test]
fn input_event_equality() {
    assert_eq!(InputEvent::PointerUp, InputEvent::PointerUp);
    assert_ne!(InputEvent::PointerDown(Point::new(0.0, 0.0)), InputEvent::PointerMove(Point::new(0.0, 0.0)));
}
