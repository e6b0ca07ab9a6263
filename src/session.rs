//! Editing session: wires the scene core to storage, import, and export.
//!
//! DESIGN
//! ======
//! `EngineCore` reports what happened as `Action`s and never touches the
//! outside world. `Studio` is the host that acts on them: persistence
//! requests write the snapshot through to the store, render requests repaint
//! the frame once per batch, notices queue up for the user. Everything else
//! is handed back to the caller.
//!
//! Write-through failures never interrupt editing. They are logged and the
//! in-memory scene stays authoritative for the rest of the session.

use std::path::{Path, PathBuf};

use canvas::camera::{Point, Viewport};
use canvas::doc::{ShapeId, ShapeKind, ShapeOverrides, ShapeType, Snapshot};
use canvas::engine::{Action, EngineCore};
use canvas::input::InputEvent;
use canvas::raster::PixmapSurface;
use canvas::surface::ImageHandle;
use canvas::template::Template;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::StudioConfig;
use crate::export::{self, ExportError};
use crate::import::{self, ImportError};
use crate::storage::{DesignStore, SavedDesign, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Please enter a save name.")]
    EmptySaveName,
    #[error("no save with id {0}")]
    UnknownSave(Uuid),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// An image import whose decode has not finished yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingImage {
    pub id: ShapeId,
    pub path: PathBuf,
}

pub struct Studio<S> {
    core: EngineCore,
    store: S,
    config: StudioConfig,
    viewport: Viewport,
    frame: Option<PixmapSurface>,
    notices: Vec<String>,
}

impl<S: DesignStore> Studio<S> {
    #[must_use]
    pub fn new(config: StudioConfig, store: S) -> Self {
        Self {
            core: EngineCore::new(config.canvas_width, config.canvas_height),
            viewport: Viewport::identity(config.canvas_width, config.canvas_height),
            store,
            config,
            frame: None,
            notices: Vec::new(),
        }
    }

    // --- Lifecycle ---

    /// Hydrate from the last write-through snapshot and paint once.
    pub async fn init(&mut self) {
        self.hydrate().await;
        self.render();
    }

    async fn hydrate(&mut self) {
        let snapshot = match self.store.load_current() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                info!("no saved design; starting empty");
                return;
            }
            Err(e) => {
                warn!(error = %e, "saved design unreadable; starting empty");
                return;
            }
        };
        // Already persisted; `init` repaints once images are back.
        self.core.load_snapshot(snapshot);
        self.restore_images().await;
        info!(shapes = self.core.scene.len(), "session hydrated");
    }

    /// Decode every image shape again from its recorded source.
    async fn restore_images(&mut self) -> Vec<Action> {
        let sources: Vec<(ShapeId, String)> = self
            .core
            .scene
            .shapes()
            .iter()
            .filter_map(|s| match &s.kind {
                ShapeKind::Image { src: Some(src), .. } => Some((s.id.clone(), src.clone())),
                _ => None,
            })
            .collect();
        let mut actions = Vec::new();
        for (id, src) in sources {
            let decoded = match import::source_path(&src) {
                Ok(path) => import::load_image_async(path).await,
                Err(e) => Err(e),
            };
            match decoded {
                Ok(image) => actions.extend(self.core.attach_image(&id, image)),
                Err(e) => warn!(%id, error = %e, "image not restored; shape stays empty"),
            }
        }
        actions
    }

    /// Paint the on-screen frame (with selection overlay).
    ///
    /// On failure the previous frame is kept and `false` is returned.
    pub fn render(&mut self) -> bool {
        let mut surface = match PixmapSurface::new(self.core.scene.width(), self.core.scene.height(), 1.0) {
            Ok(surface) => surface,
            Err(e) => {
                error!(error = %e, "cannot allocate frame");
                return false;
            }
        };
        if !self.core.render(&mut surface) {
            return false;
        }
        self.frame = Some(surface);
        true
    }

    /// Act on core actions; return the ones meant for the caller.
    fn apply(&mut self, actions: Vec<Action>) -> Vec<Action> {
        let mut persist = false;
        let mut repaint = false;
        let mut rest = Vec::new();
        for action in actions {
            match action {
                Action::PersistRequested => persist = true,
                Action::RenderNeeded => repaint = true,
                Action::Notice(message) => {
                    info!(%message, "notice");
                    self.notices.push(message);
                }
                other => rest.push(other),
            }
        }
        if persist {
            self.persist();
        }
        if repaint {
            self.render();
        }
        rest
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save_current(&self.core.snapshot()) {
            warn!(error = %e, "write-through save failed; keeping in-memory design");
        }
    }

    // --- Input ---

    /// Feed an event whose points are already in scene units.
    pub fn handle_event(&mut self, event: InputEvent) -> Vec<Action> {
        let actions = self.core.handle_event(event);
        self.apply(actions)
    }

    /// Feed an event whose points are element-relative client pixels.
    pub fn handle_client_event(&mut self, event: InputEvent) -> Vec<Action> {
        let to_scene = |p: Point| self.viewport.client_to_scene(p);
        let event = match event {
            InputEvent::PointerDown(p) => InputEvent::PointerDown(to_scene(p)),
            InputEvent::PointerMove(p) => InputEvent::PointerMove(to_scene(p)),
            InputEvent::DoubleClick(p) => InputEvent::DoubleClick(to_scene(p)),
            other => other,
        };
        self.handle_event(event)
    }

    /// Record the displayed size of the canvas element.
    pub fn set_client_size(&mut self, width: f64, height: f64) {
        self.viewport.client_width = width;
        self.viewport.client_height = height;
    }

    // --- Scene operations ---

    pub fn add_shape(&mut self, shape_type: ShapeType, overrides: &ShapeOverrides) -> Vec<Action> {
        let actions = self.core.add_shape(shape_type, overrides);
        self.apply(actions)
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        let actions = self.core.delete_selected();
        self.apply(actions)
    }

    pub fn bring_selected_to_front(&mut self) -> Vec<Action> {
        let actions = self.core.bring_selected_to_front();
        self.apply(actions)
    }

    pub fn select(&mut self, id: Option<&ShapeId>) -> Vec<Action> {
        let actions = self.core.select(id);
        self.apply(actions)
    }

    pub fn update_selected(&mut self, overrides: &ShapeOverrides) -> Vec<Action> {
        let actions = self.core.update_selected(overrides);
        self.apply(actions)
    }

    pub fn commit_text(&mut self, id: &ShapeId, text: &str) -> Vec<Action> {
        let actions = self.core.commit_text(id, text);
        self.apply(actions)
    }

    /// Empty the scene and forget the write-through snapshot.
    pub fn clear_all(&mut self) -> Vec<Action> {
        let mut actions = self.core.clear();
        actions.retain(|a| *a != Action::PersistRequested);
        if let Err(e) = self.store.clear_current() {
            warn!(error = %e, "could not clear stored design");
        }
        self.apply(actions)
    }

    pub fn load_template(&mut self, template: Template) -> Vec<Action> {
        let actions = self.core.load_snapshot(template.snapshot());
        info!(?template, "template loaded");
        self.apply(actions)
    }

    // --- Named saves ---

    /// Store the current design under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptySaveName`] for a blank name, or
    /// [`SessionError::Storage`] if the save list cannot be written.
    pub fn save_named(&mut self, name: &str) -> Result<SavedDesign, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptySaveName);
        }
        let entry = SavedDesign::new(name, self.core.snapshot());
        self.store.append_save(entry.clone())?;
        info!(id = %entry.id, name, shapes = entry.snapshot.objects.len(), "design saved");
        Ok(entry)
    }

    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if the save list cannot be read.
    pub fn list_saves(&self) -> Result<Vec<SavedDesign>, SessionError> {
        Ok(self.store.list_saves()?)
    }

    /// Replace the current design with a named save, decoding its images
    /// again from their sources.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownSave`] if no save has `id`.
    pub async fn load_save(&mut self, id: Uuid) -> Result<Vec<Action>, SessionError> {
        let entry = self
            .store
            .list_saves()?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or(SessionError::UnknownSave(id))?;
        info!(%id, name = %entry.name, "save loaded");
        let mut actions = self.core.load_snapshot(entry.snapshot);
        actions.extend(self.restore_images().await);
        Ok(self.apply(actions))
    }

    /// # Errors
    ///
    /// Returns [`SessionError::UnknownSave`] if no save has `id`.
    pub fn delete_save(&mut self, id: Uuid) -> Result<(), SessionError> {
        if !self.store.remove_save(id)? {
            return Err(SessionError::UnknownSave(id));
        }
        info!(%id, "save deleted");
        Ok(())
    }

    // --- Images ---

    /// First phase of an import: a placeholder shape, selected and persisted.
    pub fn begin_image_import(&mut self, path: &Path) -> (PendingImage, Vec<Action>) {
        let src = path.display().to_string();
        let (id, actions) = self.core.begin_image(&src);
        let actions = self.apply(actions);
        info!(%id, %src, "image import started");
        (PendingImage { id, path: path.to_owned() }, actions)
    }

    /// Second phase of an import, once decoding finished either way.
    pub fn finish_image_import(&mut self, pending: &PendingImage, decoded: Result<ImageHandle, ImportError>) -> Vec<Action> {
        let actions = match decoded {
            Ok(image) => self.core.resolve_image(&pending.id, image),
            Err(e) => self.core.fail_image(&pending.id, &e.to_string()),
        };
        self.apply(actions)
    }

    /// Import an image file: placeholder now, pixels when decoded.
    pub async fn import_image_file(&mut self, path: &Path) -> (ShapeId, Vec<Action>) {
        let (pending, mut actions) = self.begin_image_import(path);
        let decoded = import::load_image_async(pending.path.clone()).await;
        actions.extend(self.finish_image_import(&pending, decoded));
        (pending.id, actions)
    }

    // --- Export ---

    /// PNG bytes of the design at the configured density.
    ///
    /// # Errors
    ///
    /// See [`export::export_bitmap`].
    pub fn export_bytes(&self) -> Result<Vec<u8>, ExportError> {
        export::export_bitmap(&self.core, self.config.export_density)
    }

    /// Write the design to `<data dir>/<export filename>`.
    ///
    /// # Errors
    ///
    /// See [`export::write_png`].
    pub fn export(&self) -> Result<PathBuf, ExportError> {
        let path = self.config.export_path();
        export::write_png(&self.core, self.config.export_density, &path)?;
        Ok(path)
    }

    // --- Queries ---

    #[must_use]
    pub fn core(&self) -> &EngineCore {
        &self.core
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.core.snapshot()
    }

    /// The last successfully painted frame.
    #[must_use]
    pub fn frame(&self) -> Option<&PixmapSurface> {
        self.frame.as_ref()
    }

    /// Drain queued user notices.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Client-space position of the floating delete control.
    #[must_use]
    pub fn delete_button_position(&self) -> Option<Point> {
        self.core.delete_button_position(&self.viewport)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
