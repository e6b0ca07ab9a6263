//! Studio configuration parsed from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use canvas::doc::DEFAULT_SCENE_SIZE;

pub const DEFAULT_DATA_DIR: &str = ".sticker-studio";
pub const DEFAULT_EXPORT_FILENAME: &str = "sticker.png";
pub const DEFAULT_EXPORT_DENSITY: f64 = 1.0;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a positive number, got {value:?}")]
    InvalidSize { key: &'static str, value: String },
    #[error("{key} must not be empty")]
    Empty { key: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudioConfig {
    /// Holds `current.json` and `saves.json`.
    pub data_dir: PathBuf,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Device pixels per scene unit for export; never below 1.
    pub export_density: f64,
    pub export_filename: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            canvas_width: DEFAULT_SCENE_SIZE,
            canvas_height: DEFAULT_SCENE_SIZE,
            export_density: DEFAULT_EXPORT_DENSITY,
            export_filename: DEFAULT_EXPORT_FILENAME.to_owned(),
        }
    }
}

impl StudioConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `STUDIO_DATA_DIR`: default `.sticker-studio`
    /// - `STUDIO_CANVAS_WIDTH`, `STUDIO_CANVAS_HEIGHT`: default 800
    /// - `STUDIO_EXPORT_DENSITY`: default 1.0, raised to at least 1.0
    /// - `STUDIO_EXPORT_FILENAME`: default `sticker.png`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a canvas size that is not a positive
    /// number, or an empty data dir or filename.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = non_empty("STUDIO_DATA_DIR", lookup("STUDIO_DATA_DIR"), DEFAULT_DATA_DIR)?;
        let export_filename =
            non_empty("STUDIO_EXPORT_FILENAME", lookup("STUDIO_EXPORT_FILENAME"), DEFAULT_EXPORT_FILENAME)?;
        let density = parse_or(lookup("STUDIO_EXPORT_DENSITY"), DEFAULT_EXPORT_DENSITY);

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            canvas_width: parse_size("STUDIO_CANVAS_WIDTH", lookup("STUDIO_CANVAS_WIDTH"))?,
            canvas_height: parse_size("STUDIO_CANVAS_HEIGHT", lookup("STUDIO_CANVAS_HEIGHT"))?,
            export_density: clamp_density(density),
            export_filename,
        })
    }

    /// Where [`crate::session::Studio::export`] writes the bitmap.
    #[must_use]
    pub fn export_path(&self) -> PathBuf {
        self.data_dir.join(&self.export_filename)
    }
}

/// Parse `raw`, falling back to `default` when absent or unparsable.
pub(crate) fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}

fn parse_size(key: &'static str, raw: Option<String>) -> Result<f64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SCENE_SIZE);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ConfigError::InvalidSize { key, value: raw }),
    }
}

fn non_empty(key: &'static str, raw: Option<String>, default: &str) -> Result<String, ConfigError> {
    match raw {
        None => Ok(default.to_owned()),
        Some(v) if v.trim().is_empty() => Err(ConfigError::Empty { key }),
        Some(v) => Ok(v),
    }
}

/// Export density is at least 1, like `max(1, devicePixelRatio)`.
#[must_use]
pub fn clamp_density(density: f64) -> f64 {
    if density.is_finite() { density.max(1.0) } else { DEFAULT_EXPORT_DENSITY }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
