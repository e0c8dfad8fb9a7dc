//! Package directory inspection.
//!
//! autopkgtest discovers tests through `debian/tests/control`. The runner
//! only checks that the file exists to give the user early feedback; the
//! control file itself is never parsed here.

use std::fmt;
use std::path::{Path, PathBuf};

/// Result of inspecting a selected package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageCheck {
    /// `debian/tests/control` exists at the contained path.
    ControlFound(PathBuf),
    /// `debian/tests` exists but has no `control` file.
    MissingControl,
    /// There is no `debian/tests` directory at all.
    MissingTestsDir,
}

impl PackageCheck {
    /// Inspect `directory` for an autopkgtest control file.
    pub fn inspect(directory: &Path) -> Self {
        let tests_dir = directory.join("debian").join("tests");
        if !tests_dir.is_dir() {
            return PackageCheck::MissingTestsDir;
        }

        let control = tests_dir.join("control");
        if control.exists() {
            PackageCheck::ControlFound(control)
        } else {
            PackageCheck::MissingControl
        }
    }

    /// Whether a control file was found.
    pub fn has_control(&self) -> bool {
        matches!(self, PackageCheck::ControlFound(_))
    }

    /// One-line message for the status bar.
    pub fn status_message(&self) -> String {
        match self {
            PackageCheck::ControlFound(path) => {
                format!("Found test control: {}", path.display())
            }
            PackageCheck::MissingControl => "No debian/tests/control found".to_string(),
            PackageCheck::MissingTestsDir => "No debian/tests directory".to_string(),
        }
    }
}

impl fmt::Display for PackageCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_message())
    }
}

/// Short label for a package directory, used as the window subtitle.
pub fn display_name(directory: &Path) -> String {
    directory
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| directory.display().to_string())
}
