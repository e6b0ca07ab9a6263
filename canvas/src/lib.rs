//! Scene editing core for the sticker studio.
//!
//! This crate owns everything between a pointer event and a painted frame:
//! the ordered shape list and its selection, the geometry used to pick shapes
//! and resize handles, the pointer state machine that moves and resizes them,
//! and the renderer that projects the scene onto a raster target. The host
//! application is responsible only for delivering input events, persisting
//! the [`engine::Action`]s it receives, and supplying a [`surface::Surface`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::EngineCore`]: event handling and scene operations |
//! | [`doc`] | Scene model: shapes, selection, snapshots |
//! | [`hit`] | Hit-testing, handle anchors, selection outlines |
//! | [`input`] | Input event types and the pointer state machine states |
//! | [`render`] | Paints a scene (and selection overlay) onto a [`surface::Surface`] |
//! | [`surface`] | Raster target abstraction, paths, colors, decoded images |
//! | [`raster`] | Software raster target backed by `tiny-skia` (feature `raster`) |
//! | [`web`] | Browser `CanvasRenderingContext2d` target (feature `web`) |
//! | [`camera`] | Client-space to scene-space viewport mapping |
//! | [`color`] | CSS hex color parsing |
//! | [`template`] | Built-in starter designs |
//! | [`consts`] | Shared numeric constants (pick radius, resize floors, etc.) |

pub mod camera;
pub mod color;
pub mod consts;
pub mod doc;
pub mod engine;
#[cfg(feature = "raster")]
mod fonts;
pub mod hit;
pub mod input;
#[cfg(feature = "raster")]
pub mod raster;
pub mod render;
pub mod surface;
pub mod template;
#[cfg(feature = "web")]
pub mod web;
