//! Sticker studio host: persistence, image import, bitmap export, and the
//! editing session around the [`canvas`] scene core.
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | [`session::Studio`]: acts on core actions, named saves, templates |
//! | [`storage`] | Write-through current design and the named-save list |
//! | [`import`] | Decode image files into drawable pixels |
//! | [`export`] | Render shapes and encode PNG |
//! | [`config`] | Environment configuration |

pub mod config;
pub mod export;
pub mod import;
pub mod session;
pub mod storage;
