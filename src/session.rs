//! Window geometry persistence.
//!
//! The main window's size and maximized flag are written on shutdown and
//! read once at startup. Anything that goes wrong while reading degrades to
//! the default geometry; a stale or corrupt session file must never keep the
//! application from starting.

use crate::config::{config_dir, ensure_parent_dir};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The filename for the session document.
const SESSION_FILENAME: &str = "session.json";

/// Default window width in pixels.
pub const DEFAULT_WIDTH: u32 = 800;

/// Default window height in pixels.
pub const DEFAULT_HEIGHT: u32 = 600;

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

/// Window placement restored across launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub maximized: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            maximized: false,
        }
    }
}

impl SessionState {
    /// Build a session record from live window geometry.
    ///
    /// Fractional sizes are rounded; degenerate sizes fall back to the
    /// defaults so a minimized window does not persist as 0x0.
    pub fn from_geometry(width: f32, height: f32, maximized: bool) -> Self {
        let to_px = |value: f32, fallback: u32| {
            if value.is_finite() && value >= 1.0 {
                value.round() as u32
            } else {
                fallback
            }
        };

        Self {
            width: to_px(width, DEFAULT_WIDTH),
            height: to_px(height, DEFAULT_HEIGHT),
            maximized,
        }
    }
}

/// Loads and saves [`SessionState`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the default location (`<config_dir>/session.json`).
    pub fn new() -> Result<Self> {
        Ok(Self::at(config_dir()?.join(SESSION_FILENAME)))
    }

    /// Store at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the session document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved window geometry.
    ///
    /// Never fails: a missing, unreadable, or malformed file yields
    /// [`SessionState::default`].
    pub fn load(&self) -> SessionState {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return SessionState::default();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Could not read session file");
                return SessionState::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring malformed session file");
                SessionState::default()
            }
        }
    }

    /// Overwrite the session file with `state`.
    pub fn save(&self, state: &SessionState) -> Result<()> {
        ensure_parent_dir(&self.path)?;
        fs::write(&self.path, serde_json::to_string(state)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(temp_dir: &TempDir) -> SessionStore {
        SessionStore::at(temp_dir.path().join("session.json"))
    }

    #[test]
    fn test_default_geometry() {
        let state = SessionState::default();
        assert_eq!(state.width, 800);
        assert_eq!(state.height, 600);
        assert!(!state.maximized);
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(store_in(&temp_dir).load(), SessionState::default());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::at(temp_dir.path().join("deep").join("session.json"));

        for state in [
            SessionState::default(),
            SessionState {
                width: 1920,
                height: 1080,
                maximized: true,
            },
            SessionState {
                width: 1,
                height: u32::MAX,
                maximized: false,
            },
        ] {
            store.save(&state).unwrap();
            assert_eq!(store.load(), state);
        }
    }

    #[test]
    fn test_load_malformed_content_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        for content in [
            "",
            "{\"width\": 1024, \"height\":",
            "not json at all",
            "{\"width\": \"wide\", \"height\": 700, \"maximized\": false}",
            "{\"width\": -5, \"height\": 700}",
            "[1, 2, 3]",
        ] {
            fs::write(store.path(), content).unwrap();
            assert_eq!(store.load(), SessionState::default(), "content: {content}");
        }
    }

    #[test]
    fn test_load_missing_keys_use_per_key_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::write(store.path(), "{\"width\": 1024}").unwrap();

        let state = store.load();

        assert_eq!(state.width, 1024);
        assert_eq!(state.height, DEFAULT_HEIGHT);
        assert!(!state.maximized);
    }

    #[test]
    fn test_load_directory_in_place_of_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::create_dir_all(store.path()).unwrap();

        assert_eq!(store.load(), SessionState::default());
    }

    #[test]
    fn test_from_geometry_rounds_and_guards_degenerate_sizes() {
        let state = SessionState::from_geometry(1023.6, 767.2, true);
        assert_eq!(state.width, 1024);
        assert_eq!(state.height, 767);
        assert!(state.maximized);

        let state = SessionState::from_geometry(0.0, f32::NAN, false);
        assert_eq!(state.width, DEFAULT_WIDTH);
        assert_eq!(state.height, DEFAULT_HEIGHT);
    }
}
