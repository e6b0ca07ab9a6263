//! Persistence: the write-through current design and the named-save list.
//!
//! DESIGN
//! ======
//! The current design is overwritten after every mutation so a restarted
//! session resumes where it left off. Named saves are an explicit, user-driven
//! list kept separately; loading one replaces the current design but never
//! edits the list.
//!
//! Writes go to a sibling temp file first and are renamed into place, so a
//! crash mid-write leaves the previous file intact.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use canvas::doc::Snapshot;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

const CURRENT_FILE: &str = "current.json";
const SAVES_FILE: &str = "saves.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("stored data at {path} is not valid: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One entry in the named-save list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDesign {
    pub id: Uuid,
    pub name: String,
    pub snapshot: Snapshot,
    /// Unix milliseconds.
    pub created_at: i64,
}

impl SavedDesign {
    /// A new entry stamped with a fresh id and the current time.
    #[must_use]
    pub fn new(name: &str, snapshot: Snapshot) -> Self {
        Self { id: Uuid::new_v4(), name: name.to_owned(), snapshot, created_at: now_ms() }
    }
}

pub(crate) fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

/// Where designs are kept between sessions.
pub trait DesignStore {
    /// Overwrite the write-through snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the snapshot cannot be written.
    fn save_current(&mut self, snapshot: &Snapshot) -> Result<(), StorageError>;

    /// The last written snapshot, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if stored data exists but cannot be read.
    fn load_current(&self) -> Result<Option<Snapshot>, StorageError>;

    /// Forget the write-through snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the snapshot cannot be removed.
    fn clear_current(&mut self) -> Result<(), StorageError>;

    /// Named saves, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if stored data exists but cannot be read.
    fn list_saves(&self) -> Result<Vec<SavedDesign>, StorageError>;

    /// Append to the end of the named-save list.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the list cannot be read or written.
    fn append_save(&mut self, entry: SavedDesign) -> Result<(), StorageError>;

    /// Remove a named save. Returns `false` if no entry had that id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the list cannot be read or written.
    fn remove_save(&mut self, id: Uuid) -> Result<bool, StorageError>;
}

// =============================================================
// File store
// =============================================================

/// JSON files in one directory: `current.json` and `saves.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io { path: dir.clone(), source })?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(StorageError::Io { path: path.to_owned(), source }),
    };
    serde_json::from_slice(&raw)
        .map(Some)
        .map_err(|source| StorageError::Json { path: path.to_owned(), source })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let bytes = serde_json::to_vec(value).map_err(|source| StorageError::Json { path: path.to_owned(), source })?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).map_err(|source| StorageError::Io { path: tmp.clone(), source })?;
    fs::rename(&tmp, path).map_err(|source| StorageError::Io { path: path.to_owned(), source })?;
    debug!(path = %path.display(), "stored");
    Ok(())
}

impl DesignStore for FileStore {
    fn save_current(&mut self, snapshot: &Snapshot) -> Result<(), StorageError> {
        write_json(&self.path(CURRENT_FILE), snapshot)
    }

    fn load_current(&self) -> Result<Option<Snapshot>, StorageError> {
        read_json(&self.path(CURRENT_FILE))
    }

    fn clear_current(&mut self) -> Result<(), StorageError> {
        let path = self.path(CURRENT_FILE);
        match fs::remove_file(&path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(StorageError::Io { path, source: e }),
            _ => Ok(()),
        }
    }

    fn list_saves(&self) -> Result<Vec<SavedDesign>, StorageError> {
        Ok(read_json(&self.path(SAVES_FILE))?.unwrap_or_default())
    }

    fn append_save(&mut self, entry: SavedDesign) -> Result<(), StorageError> {
        let mut saves = self.list_saves()?;
        saves.push(entry);
        write_json(&self.path(SAVES_FILE), &saves)
    }

    fn remove_save(&mut self, id: Uuid) -> Result<bool, StorageError> {
        let mut saves = self.list_saves()?;
        let before = saves.len();
        saves.retain(|s| s.id != id);
        if saves.len() == before {
            return Ok(false);
        }
        write_json(&self.path(SAVES_FILE), &saves)?;
        Ok(true)
    }
}

// =============================================================
// Memory store
// =============================================================

/// In-process store for embedding and tests. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    current: Option<Snapshot>,
    saves: Vec<SavedDesign>,
}

impl DesignStore for MemoryStore {
    fn save_current(&mut self, snapshot: &Snapshot) -> Result<(), StorageError> {
        self.current = Some(snapshot.clone());
        Ok(())
    }

    fn load_current(&self) -> Result<Option<Snapshot>, StorageError> {
        Ok(self.current.clone())
    }

    fn clear_current(&mut self) -> Result<(), StorageError> {
        self.current = None;
        Ok(())
    }

    fn list_saves(&self) -> Result<Vec<SavedDesign>, StorageError> {
        Ok(self.saves.clone())
    }

    fn append_save(&mut self, entry: SavedDesign) -> Result<(), StorageError> {
        self.saves.push(entry);
        Ok(())
    }

    fn remove_save(&mut self, id: Uuid) -> Result<bool, StorageError> {
        let before = self.saves.len();
        self.saves.retain(|s| s.id != id);
        Ok(self.saves.len() != before)
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
