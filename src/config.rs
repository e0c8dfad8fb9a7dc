use crate::error::{Result, RunnerError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// The base config directory name under the user's config home.
const CONFIG_DIR_NAME: &str = "autopkgtest-runner";

/// The filename for the settings document.
const SETTINGS_FILENAME: &str = "settings.json";

// ============================================================================
// Config Directory
// ============================================================================

/// Get the application config directory path.
///
/// Uses `$XDG_CONFIG_HOME/autopkgtest-runner/` when `XDG_CONFIG_HOME` is set
/// to a non-empty value, otherwise `~/.config/autopkgtest-runner/`.
/// Does not create the directory.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(xdg) = env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join(CONFIG_DIR_NAME));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| RunnerError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME))
}

/// Ensure the directory containing `path` exists.
///
/// Returns whether the directory was newly created.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<bool> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            let created = !parent.exists();
            fs::create_dir_all(parent)?;
            Ok(created)
        }
        _ => Ok(false),
    }
}

// ============================================================================
// Virtualization Backend
// ============================================================================

/// The virtualization server passed to autopkgtest after `--`.
///
/// `Null` runs the tests directly on the host with no isolation at all.
/// It is a convenience mode, not a sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Virtualization {
    #[default]
    Null,
    Schroot,
    Lxc,
    Qemu,
}

impl Virtualization {
    /// All backends, in the order they are offered to the user.
    pub fn all() -> &'static [Virtualization] {
        &[
            Virtualization::Null,
            Virtualization::Schroot,
            Virtualization::Lxc,
            Virtualization::Qemu,
        ]
    }

    /// The argument autopkgtest expects for this backend.
    pub fn as_arg(self) -> &'static str {
        match self {
            Virtualization::Null => "null",
            Virtualization::Schroot => "schroot",
            Virtualization::Lxc => "lxc",
            Virtualization::Qemu => "qemu",
        }
    }

    /// Parse a backend name as accepted on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|v| v.as_arg().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Virtualization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Persisted user preferences.
///
/// Missing fields fall back to their defaults, so a document written by an
/// older version (only `welcome_shown`) still loads.
///
/// # Example
///
/// ```json
/// {
///   "welcome_shown": true,
///   "virtualization": "null"
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Whether the welcome dialog has been dismissed at least once.
    #[serde(default)]
    pub welcome_shown: bool,

    /// Backend passed to autopkgtest after `--`.
    #[serde(default)]
    pub virtualization: Virtualization,
}

impl Settings {
    /// Returns a copy with the welcome dialog marked as dismissed.
    pub fn with_welcome_shown(self) -> Self {
        Self {
            welcome_shown: true,
            ..self
        }
    }

    /// Returns a copy using the given backend.
    pub fn with_virtualization(self, virtualization: Virtualization) -> Self {
        Self {
            virtualization,
            ..self
        }
    }
}

/// Loads and saves [`Settings`] at a fixed path.
///
/// `load` hands out an owned snapshot; changes only reach disk through an
/// explicit `save`.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store at the default location (`<config_dir>/settings.json`).
    pub fn new() -> Result<Self> {
        Ok(Self::at(config_dir()?.join(SETTINGS_FILENAME)))
    }

    /// Store at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the settings document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted settings.
    ///
    /// A missing file yields [`Settings::default`]. A file that exists but
    /// cannot be read or parsed is an error.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            RunnerError::Config(format!(
                "Failed to parse settings file at {:?}: {}",
                self.path, e
            ))
        })
    }

    /// Overwrite the settings file with `settings`.
    ///
    /// Creates the containing directory when needed.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        ensure_parent_dir(&self.path)?;
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content)?;
        tracing::debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}
