pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod gui;
pub mod history;
pub mod output;
pub mod package;
pub mod runner;
pub mod session;
pub mod signal;

#[cfg(test)]
pub mod test_utils;

pub use config::{Settings, SettingsStore, Virtualization};
pub use controller::{RunAction, RunController};
pub use error::{Result, RunnerError};
pub use history::{HistoryEntry, RunHistory};
pub use package::PackageCheck;
pub use runner::{ProcessHandle, RunEvent, RunOutcome, ToolConfig};
pub use session::{SessionState, SessionStore};
