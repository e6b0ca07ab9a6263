//! Input model: pointer and keyboard events, and the gesture state machine.
//!
//! `InputEvent` is the single entry point the host feeds into
//! [`crate::engine::EngineCore::handle_event`], already mapped into scene
//! coordinates. `InputState` is the active gesture tracked between
//! pointer-down and pointer-up. Only one pointer is tracked.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::ShapeId;

/// A keyboard key, as named by the host (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// `Delete` or `Backspace`.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }
}

/// One input event in scene coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary pointer pressed (mouse button or single touch).
    PointerDown(Point),
    /// Pointer moved, pressed or not.
    PointerMove(Point),
    /// Pointer released or touch ended.
    PointerUp,
    /// Double click or double tap.
    DoubleClick(Point),
    /// Key pressed. `in_editable` is true when focus is inside a text field,
    /// in which case editing keys belong to that field.
    KeyDown { key: Key, in_editable: bool },
}

/// Internal state for the pointer state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving a shape.
    Dragging {
        /// Id of the shape being dragged.
        id: ShapeId,
        /// Pointer position minus shape center at pointer-down.
        grab_offset: Point,
    },
    /// The user is resizing a shape by its handle.
    Resizing {
        /// Id of the shape being resized.
        id: ShapeId,
    },
}

impl InputState {
    /// Id of the shape the active gesture targets.
    #[must_use]
    pub fn target(&self) -> Option<&ShapeId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. } | Self::Resizing { id } => Some(id),
        }
    }
}
