use tracing::{debug, error, warn};

use crate::camera::{Point, Viewport};
use crate::consts::{
    IMAGE_MAX_WIDTH, IMAGE_PLACEHOLDER_HEIGHT, IMAGE_PLACEHOLDER_WIDTH, MIN_BOX_EXTENT, MIN_FONT_SIZE, MIN_RADIUS,
};
use crate::doc::{Scene, Shape, ShapeId, ShapeKind, ShapeOverrides, ShapeType, Snapshot};
use crate::hit::{self, HitPart};
use crate::input::{InputEvent, InputState, Key};
use crate::render;
use crate::surface::{ImageHandle, Surface};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Notice shown to the user when an imported image cannot be decoded.
pub const IMAGE_FAILED_NOTICE: &str = "Image failed to load.";

/// Actions returned from input handlers and scene operations for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A shape was added to the scene.
    ShapeCreated(ShapeId),
    /// A shape was removed from the scene.
    ShapeDeleted(ShapeId),
    /// The selection changed.
    SelectionChanged(Option<ShapeId>),
    /// The scene changed; write the current snapshot through to storage.
    PersistRequested,
    /// The frame is stale; paint again.
    RenderNeeded,
    /// Open the inline text editor for a text shape.
    EditTextRequested { id: ShapeId, text: String },
    /// Show a blocking notice to the user.
    Notice(String),
}

/// Core engine state: the scene and the active gesture.
///
/// Holds no reference to any windowing or graphics toolkit, so it can be
/// driven and inspected directly in tests.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub scene: Scene,
    pub input: InputState,
}

fn mutated() -> Vec<Action> {
    vec![Action::PersistRequested, Action::RenderNeeded]
}

impl EngineCore {
    /// An engine over an empty scene of the given size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { scene: Scene::new(width, height), input: InputState::Idle }
    }

    // --- Input events ---

    /// Feed one input event through the state machine.
    pub fn handle_event(&mut self, event: InputEvent) -> Vec<Action> {
        match event {
            InputEvent::PointerDown(pt) => self.on_pointer_down(pt),
            InputEvent::PointerMove(pt) => self.on_pointer_move(pt),
            InputEvent::PointerUp => self.on_pointer_up(),
            InputEvent::DoubleClick(pt) => self.on_double_click(pt),
            InputEvent::KeyDown { key, in_editable } => self.on_key_down(&key, in_editable),
        }
    }

    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        let Some(hit) = hit::hit_scene(&self.scene, pt) else {
            self.input = InputState::Idle;
            if self.scene.select(None) {
                actions.push(Action::SelectionChanged(None));
            }
            actions.push(Action::RenderNeeded);
            return actions;
        };

        if self.scene.select(Some(&hit.shape_id)) {
            actions.push(Action::SelectionChanged(Some(hit.shape_id.clone())));
        }
        self.input = match hit.part {
            HitPart::ResizeHandle => InputState::Resizing { id: hit.shape_id },
            HitPart::Body => {
                let Some(shape) = self.scene.get(&hit.shape_id) else {
                    return actions;
                };
                let grab_offset = Point::new(pt.x - shape.x, pt.y - shape.y);
                InputState::Dragging { id: hit.shape_id, grab_offset }
            }
        };
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        match &self.input {
            InputState::Idle => Vec::new(),
            InputState::Dragging { id, grab_offset } => {
                let Some(shape) = self.scene.get_mut(id) else {
                    return Vec::new();
                };
                shape.x = pt.x - grab_offset.x;
                shape.y = pt.y - grab_offset.y;
                vec![Action::RenderNeeded]
            }
            InputState::Resizing { id } => {
                let Some(shape) = self.scene.get_mut(id) else {
                    return Vec::new();
                };
                resize_toward(shape, pt);
                vec![Action::RenderNeeded]
            }
        }
    }

    /// End the active gesture and write the scene through.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        vec![Action::PersistRequested]
    }

    /// Double click on a text shape asks the host to open the inline editor.
    pub fn on_double_click(&mut self, pt: Point) -> Vec<Action> {
        let Some(shape) = self.scene.shape_at(pt) else {
            return Vec::new();
        };
        let ShapeKind::Text { text, .. } = &shape.kind else {
            return Vec::new();
        };
        let id = shape.id.clone();
        let text = text.clone();
        let mut actions = Vec::new();
        if self.scene.select(Some(&id)) {
            actions.push(Action::SelectionChanged(Some(id.clone())));
        }
        actions.push(Action::RenderNeeded);
        actions.push(Action::EditTextRequested { id, text });
        actions
    }

    pub fn on_key_down(&mut self, key: &Key, in_editable: bool) -> Vec<Action> {
        if in_editable || !key.is_delete() {
            return Vec::new();
        }
        self.delete_selected()
    }

    // --- Scene operations ---

    /// Add a shape with kind defaults and `overrides`; it becomes selected.
    pub fn add_shape(&mut self, shape_type: ShapeType, overrides: &ShapeOverrides) -> Vec<Action> {
        self.add(shape_type, overrides).1
    }

    fn add(&mut self, shape_type: ShapeType, overrides: &ShapeOverrides) -> (ShapeId, Vec<Action>) {
        let id = self.scene.add_shape(shape_type, overrides).id.clone();
        debug!(%id, ?shape_type, "shape added");
        let mut actions = vec![Action::ShapeCreated(id.clone()), Action::SelectionChanged(Some(id.clone()))];
        actions.extend(mutated());
        (id, actions)
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(shape) = self.scene.delete_selected() else {
            return Vec::new();
        };
        let mut actions = vec![Action::ShapeDeleted(shape.id), Action::SelectionChanged(None)];
        actions.extend(mutated());
        actions
    }

    pub fn bring_selected_to_front(&mut self) -> Vec<Action> {
        if self.scene.bring_selected_to_front() { mutated() } else { Vec::new() }
    }

    pub fn clear(&mut self) -> Vec<Action> {
        let had_selection = self.scene.selected_id().is_some();
        self.scene.clear();
        self.input = InputState::Idle;
        let mut actions = Vec::new();
        if had_selection {
            actions.push(Action::SelectionChanged(None));
        }
        actions.extend(mutated());
        actions
    }

    /// Select a shape by id; an unknown id deselects.
    pub fn select(&mut self, id: Option<&ShapeId>) -> Vec<Action> {
        if !self.scene.select(id) {
            return Vec::new();
        }
        vec![Action::SelectionChanged(self.scene.selected_id().cloned()), Action::RenderNeeded]
    }

    /// Apply an inspector edit to the selected shape.
    pub fn update_selected(&mut self, overrides: &ShapeOverrides) -> Vec<Action> {
        let Some(id) = self.scene.selected_id().cloned() else {
            return Vec::new();
        };
        if self.scene.update(&id, overrides) { mutated() } else { Vec::new() }
    }

    /// Commit text from the host editor back into a text shape.
    pub fn commit_text(&mut self, id: &ShapeId, text: &str) -> Vec<Action> {
        let Some(shape) = self.scene.get_mut(id) else {
            return Vec::new();
        };
        let ShapeKind::Text { text: current, .. } = &mut shape.kind else {
            return Vec::new();
        };
        text.clone_into(current);
        mutated()
    }

    /// First phase of an image import: a selectable placeholder that paints
    /// nothing until [`Self::resolve_image`] attaches the decoded pixels.
    pub fn begin_image(&mut self, src: &str) -> (ShapeId, Vec<Action>) {
        let overrides = ShapeOverrides {
            w: Some(IMAGE_PLACEHOLDER_WIDTH),
            h: Some(IMAGE_PLACEHOLDER_HEIGHT),
            src: Some(src.to_owned()),
            ..Default::default()
        };
        self.add(ShapeType::Image, &overrides)
    }

    /// Second phase of an image import: attach decoded pixels and fit the
    /// box to the natural aspect ratio, capped at [`IMAGE_MAX_WIDTH`].
    ///
    /// No-op if the shape was deleted while decoding.
    pub fn resolve_image(&mut self, id: &ShapeId, image: ImageHandle) -> Vec<Action> {
        let Some(shape) = self.scene.get_mut(id) else {
            debug!(%id, "decoded image for a shape that no longer exists");
            return Vec::new();
        };
        let ShapeKind::Image { w, h, resource, .. } = &mut shape.kind else {
            return Vec::new();
        };
        let (fit_w, fit_h) = fit_image(image.width(), image.height());
        *w = fit_w;
        *h = fit_h;
        *resource = Some(image);
        mutated()
    }

    /// Re-attach pixels to an image shape without changing its box, as
    /// when hydrating a saved scene.
    pub fn attach_image(&mut self, id: &ShapeId, image: ImageHandle) -> Vec<Action> {
        let Some(Shape { kind: ShapeKind::Image { resource, .. }, .. }) = self.scene.get_mut(id) else {
            return Vec::new();
        };
        *resource = Some(image);
        vec![Action::RenderNeeded]
    }

    /// Decoding failed: the shape stays as an empty box and the user is told.
    pub fn fail_image(&self, id: &ShapeId, reason: &str) -> Vec<Action> {
        let src = match self.scene.get(id).map(|s| &s.kind) {
            Some(ShapeKind::Image { src: Some(src), .. }) => src.as_str(),
            _ => "",
        };
        warn!(%id, src, reason, "image decode failed");
        vec![Action::Notice(IMAGE_FAILED_NOTICE.to_owned())]
    }

    /// Replace the scene's shapes with a snapshot; the selection is cleared.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> Vec<Action> {
        self.scene.load_snapshot(snapshot);
        self.input = InputState::Idle;
        mutated()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.scene.snapshot()
    }

    // --- Render ---

    /// Paint the full frame (with selection overlay) onto `surface`.
    ///
    /// Errors are logged and reported as `false`; the caller should discard
    /// the frame. The next mutation naturally retries.
    pub fn render<S: Surface>(&self, surface: &mut S) -> bool {
        match render::draw(surface, &self.scene) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "render failed; frame abandoned");
                false
            }
        }
    }

    /// Paint shapes only, for export.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any surface call fails.
    pub fn render_shapes<S: Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        render::draw_shapes(surface, &self.scene)
    }

    // --- Queries ---

    /// The currently selected shape id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&ShapeId> {
        self.scene.selected_id()
    }

    /// Look up a shape by id.
    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.scene.get(id)
    }

    /// Where to show the floating delete control, in client space.
    #[must_use]
    pub fn delete_button_position(&self, viewport: &Viewport) -> Option<Point> {
        render::delete_button_position(&self.scene, viewport)
    }
}

/// Recompute a shape's extent from the pointer's offset to its center.
fn resize_toward(shape: &mut Shape, pt: Point) {
    let dx = pt.x - shape.x;
    let dy = pt.y - shape.y;
    match &mut shape.kind {
        ShapeKind::Rect { w, h } | ShapeKind::Triangle { w, h } | ShapeKind::Image { w, h, .. } => {
            *w = MIN_BOX_EXTENT.max(dx.abs() * 2.0);
            *h = MIN_BOX_EXTENT.max(dy.abs() * 2.0);
        }
        ShapeKind::Circle { r } | ShapeKind::Star { r, .. } => {
            *r = MIN_RADIUS.max(dx.hypot(dy));
        }
        ShapeKind::Text { font_size, .. } => {
            *font_size = MIN_FONT_SIZE.max((dx.abs() + 0.5).floor());
        }
    }
}

/// Box for an image of natural size `natural_w × natural_h`.
fn fit_image(natural_w: u32, natural_h: u32) -> (f64, f64) {
    let nw = if natural_w == 0 { IMAGE_MAX_WIDTH } else { f64::from(natural_w) };
    let nh = if natural_h == 0 { nw } else { f64::from(natural_h) };
    let ratio = nw / nh;
    let w = IMAGE_MAX_WIDTH.min(nw);
    let h = (w / ratio + 0.5).floor();
    (w, h)
}
