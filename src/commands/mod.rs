//! CLI command handlers for autopkgtest-runner.
//!
//! # Commands
//!
//! - [`gui`] - Open the main window (default)
//! - [`run`] - Run autopkgtest headless, streaming output to the terminal
//! - [`check`] - Inspect a package directory for a test control file
//! - [`config`] - Show configuration paths and stored values

mod check;
mod config;
mod gui;
mod run;

pub use check::check_command;
pub use config::config_command;
pub use gui::gui_command;
pub use run::{exit_code_for, run_command, RunOptions};

use crate::error::{Result, RunnerError};
use std::path::{Path, PathBuf};

/// Resolve a user-supplied package directory.
///
/// # Errors
///
/// Returns [`RunnerError::PackageNotFound`] if the path is not an existing
/// directory.
pub fn resolve_package_dir(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Err(RunnerError::PackageNotFound(path.to_path_buf()));
    }
    Ok(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()))
}
