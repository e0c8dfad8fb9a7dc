use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("No package directory selected")]
    NoPackageSelected,

    #[error("Package directory not found: {0}")]
    PackageNotFound(PathBuf),

    #[error("No active test run")]
    NoActiveRun,

    #[error("Test process error: {0}")]
    ProcessError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GUI error: {0}")]
    GuiError(String),

    #[error("Failed to register signal handler: {0}")]
    SignalHandler(String),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
