//! Test execution controller.
//!
//! Owns everything the presentation layer shows about test runs: the
//! selected package, the live log, the status line and the run history.
//! All of it is mutated on the owning thread only; the worker spawned by
//! [`RunController::start_run`] communicates exclusively through its event
//! channel, which is drained by [`RunController::poll`].

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::Virtualization;
use crate::error::{Result, RunnerError};
use crate::history::{HistoryEntry, RunHistory};
use crate::package::{display_name, PackageCheck};
use crate::runner::{spawn_worker, ProcessHandle, RunEvent, RunOutcome, ToolConfig};

/// Status line shown before anything happens.
pub const READY_STATUS: &str = "Ready";

/// Format of the time prefix on completion status lines.
const STATUS_TIME_FORMAT: &str = "%H:%M:%S";

/// Log line used when the worker disappears without reporting completion.
const WORKER_LOST_MESSAGE: &str = "Test worker exited unexpectedly";

/// What a call to [`RunController::start_run`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAction {
    /// A new run was started.
    Started,
    /// A run was already active, so stopping it was requested instead.
    StopRequested,
}

/// The single in-flight run.
struct ActiveRun {
    directory: PathBuf,
    handle: ProcessHandle,
    events: Receiver<RunEvent>,
    worker: Option<JoinHandle<()>>,
}

pub struct RunController {
    tool: ToolConfig,
    directory: Option<PathBuf>,
    package_check: Option<PackageCheck>,
    active: Option<ActiveRun>,
    log: Vec<String>,
    history: RunHistory,
    status: String,
}

impl Default for RunController {
    fn default() -> Self {
        Self::new(ToolConfig::default())
    }
}

impl RunController {
    pub fn new(tool: ToolConfig) -> Self {
        Self {
            tool,
            directory: None,
            package_check: None,
            active: None,
            log: Vec::new(),
            history: RunHistory::new(),
            status: READY_STATUS.to_string(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn tool(&self) -> &ToolConfig {
        &self.tool
    }

    /// Backend used by the next run. An active run keeps its own.
    pub fn set_backend(&mut self, backend: Virtualization) {
        self.tool.backend = backend;
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn package_check(&self) -> Option<&PackageCheck> {
        self.package_check.as_ref()
    }

    /// Basename of the selected package, for window subtitles.
    pub fn package_name(&self) -> Option<String> {
        self.directory.as_deref().map(display_name)
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Replace the status line, e.g. with an error from the view.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Whether a stop was requested for the active run.
    pub fn is_stopping(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|run| run.handle.is_cancelled())
    }

    /// Whether the Run control should be enabled.
    pub fn can_run(&self) -> bool {
        self.directory.is_some()
    }

    /// Label for the Run control.
    pub fn run_button_label(&self) -> &'static str {
        if self.is_running() {
            "Stop"
        } else {
            "Run Tests"
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Select the package directory for subsequent runs.
    ///
    /// Checks for `debian/tests/control` and reports the result on the
    /// status line. Does not affect an active run.
    pub fn select_directory(&mut self, directory: impl Into<PathBuf>) -> &PackageCheck {
        let directory = directory.into();
        let check = PackageCheck::inspect(&directory);
        tracing::debug!(directory = %directory.display(), check = %check, "Package selected");

        self.status = check.status_message();
        self.directory = Some(directory);
        self.package_check.insert(check)
    }

    /// Forget the selected package, e.g. after the user typed a bad path.
    ///
    /// Does not affect an active run.
    pub fn clear_selection(&mut self) {
        self.directory = None;
        self.package_check = None;
    }

    /// Start or stop, depending on whether a run is active.
    ///
    /// Runs against the selected directory.
    pub fn toggle_run(&mut self) -> Result<RunAction> {
        let directory = self
            .directory
            .clone()
            .ok_or(RunnerError::NoPackageSelected)?;
        self.start_run(&directory)
    }

    /// Start a run against `directory`.
    ///
    /// While a run is active this is a stop request for that run instead.
    /// Otherwise the log is cleared and the tool is spawned on a worker
    /// thread; this call never waits for the tool.
    pub fn start_run(&mut self, directory: &Path) -> Result<RunAction> {
        if self.active.is_some() {
            self.request_stop()?;
            return Ok(RunAction::StopRequested);
        }

        if directory.as_os_str().is_empty() {
            return Err(RunnerError::NoPackageSelected);
        }

        let (tx, rx) = mpsc::channel();
        let handle = ProcessHandle::new();
        let worker = spawn_worker(
            self.tool.clone(),
            directory.to_path_buf(),
            handle.clone(),
            tx,
        )?;

        self.log.clear();
        self.status = format!("Running tests for {}...", display_name(directory));
        self.active = Some(ActiveRun {
            directory: directory.to_path_buf(),
            handle,
            events: rx,
            worker: Some(worker),
        });
        Ok(RunAction::Started)
    }

    /// Ask the active run to stop.
    ///
    /// The tool's process group gets SIGTERM, then SIGKILL if it outlives
    /// the grace period. The worker stops forwarding output at its next line
    /// boundary. Completion is still reported through
    /// [`RunController::poll`].
    pub fn request_stop(&mut self) -> Result<()> {
        let run = self.active.as_ref().ok_or(RunnerError::NoActiveRun)?;
        let signalled = run.handle.request_stop()?;
        tracing::info!(directory = %run.directory.display(), signalled, "Stop requested");
        self.status = "Stopping tests...".to_string();
        Ok(())
    }

    /// Apply all events currently queued by the worker, without blocking.
    ///
    /// Returns the applied events in arrival order.
    pub fn poll(&mut self) -> Vec<RunEvent> {
        self.drain(None)
    }

    /// Like [`RunController::poll`], but waits up to `timeout` for the first
    /// event when none is queued.
    pub fn poll_timeout(&mut self, timeout: Duration) -> Vec<RunEvent> {
        self.drain(Some(timeout))
    }

    /// Block until the active run completes and return its outcome.
    ///
    /// Returns `None` when no run is active.
    pub fn wait_for_completion(&mut self) -> Option<RunOutcome> {
        while self.active.is_some() {
            for event in self.poll_timeout(Duration::from_millis(100)) {
                if let RunEvent::RunCompleted(outcome) = event {
                    return Some(outcome);
                }
            }
        }
        None
    }

    fn drain(&mut self, mut timeout: Option<Duration>) -> Vec<RunEvent> {
        let mut applied = Vec::new();

        while let Some(run) = self.active.as_ref() {
            let next = match timeout.take() {
                Some(timeout) => match run.events.recv_timeout(timeout) {
                    Ok(event) => Ok(event),
                    Err(RecvTimeoutError::Timeout) => Err(TryRecvError::Empty),
                    Err(RecvTimeoutError::Disconnected) => Err(TryRecvError::Disconnected),
                },
                None => run.events.try_recv(),
            };

            let event = match next {
                Ok(event) => event,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("Test worker channel closed without completion");
                    let line = RunEvent::LineProduced(WORKER_LOST_MESSAGE.to_string());
                    self.apply(line.clone());
                    applied.push(line);
                    RunEvent::RunCompleted(RunOutcome::ToolNotFound)
                }
            };

            self.apply(event.clone());
            applied.push(event);
        }

        applied
    }

    fn apply(&mut self, event: RunEvent) {
        match event {
            RunEvent::LineProduced(line) => self.log.push(line),
            RunEvent::RunCompleted(outcome) => self.finish(outcome),
        }
    }

    /// Completion bookkeeping; runs exactly once per run.
    fn finish(&mut self, outcome: RunOutcome) {
        let Some(mut run) = self.active.take() else {
            return;
        };
        if let Some(worker) = run.worker.take() {
            if worker.join().is_err() {
                tracing::error!("Test worker panicked");
            }
        }

        let entry = HistoryEntry::now(outcome);
        self.status = format!(
            "{} - {}",
            entry.timestamp.format(STATUS_TIME_FORMAT),
            outcome.status_text()
        );
        tracing::info!(
            directory = %run.directory.display(),
            outcome = %outcome.status_text(),
            "Test run finished"
        );
        self.history.record(entry);
    }
}

impl Drop for RunController {
    fn drop(&mut self) {
        if let Some(run) = self.active.as_ref() {
            // Do not leave the tool running once nobody can see its output
            let _ = run.handle.request_stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn shell_controller(script: &str) -> RunController {
        RunController::new(
            ToolConfig::default()
                .with_program("sh")
                .with_leading_args(["-c", script, "fake-autopkgtest"]),
        )
    }

    #[test]
    fn test_new_controller_is_idle() {
        let controller = RunController::default();
        assert!(!controller.is_running());
        assert!(!controller.can_run());
        assert_eq!(controller.status(), READY_STATUS);
        assert_eq!(controller.run_button_label(), "Run Tests");
        assert!(controller.history().is_empty());
    }

    #[test]
    fn test_toggle_without_directory_is_error() {
        let mut controller = RunController::default();
        assert!(matches!(
            controller.toggle_run(),
            Err(RunnerError::NoPackageSelected)
        ));
        assert!(controller.history().is_empty());
    }

    #[test]
    fn test_start_with_empty_directory_is_error() {
        let mut controller = RunController::default();
        assert!(matches!(
            controller.start_run(Path::new("")),
            Err(RunnerError::NoPackageSelected)
        ));
        assert!(!controller.is_running());
    }

    #[test]
    fn test_request_stop_without_run_is_error() {
        let mut controller = RunController::default();
        assert!(matches!(
            controller.request_stop(),
            Err(RunnerError::NoActiveRun)
        ));
    }

    #[test]
    fn test_select_directory_with_control_file() {
        let temp_dir = TempDir::new().unwrap();
        let pkg = temp_dir.path().join("pkgA");
        let tests_dir = pkg.join("debian").join("tests");
        fs::create_dir_all(&tests_dir).unwrap();
        fs::write(tests_dir.join("control"), "Tests: smoke\n").unwrap();

        let mut controller = RunController::default();
        let check = controller.select_directory(&pkg).clone();

        assert!(check.has_control());
        assert!(controller.can_run());
        assert_eq!(controller.package_name().as_deref(), Some("pkgA"));
        assert!(controller
            .status()
            .contains(&tests_dir.join("control").display().to_string()));
    }

    #[test]
    fn test_select_directory_without_tests_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mut controller = RunController::default();

        controller.select_directory(temp_dir.path().join("pkgB"));

        assert_eq!(controller.status(), "No debian/tests directory");
        assert!(controller.can_run());
    }

    #[test]
    fn test_clear_selection_disables_run() {
        let temp_dir = TempDir::new().unwrap();
        let mut controller = RunController::default();
        controller.select_directory(temp_dir.path());
        assert!(controller.can_run());

        controller.clear_selection();

        assert!(!controller.can_run());
        assert!(controller.directory().is_none());
        assert!(controller.package_check().is_none());
        assert!(matches!(
            controller.toggle_run(),
            Err(RunnerError::NoPackageSelected)
        ));
    }

    #[test]
    fn test_missing_tool_yields_single_tool_not_found_entry() {
        let mut controller = RunController::new(
            ToolConfig::default().with_program("autopkgtest-runner-no-such-tool"),
        );

        assert_eq!(
            controller.start_run(Path::new("/tmp/pkgA")).unwrap(),
            RunAction::Started
        );
        let outcome = controller.wait_for_completion();

        assert_eq!(outcome, Some(RunOutcome::ToolNotFound));
        assert!(!controller.is_running());
        assert_eq!(controller.history().len(), 1);
        assert_eq!(
            controller.history().latest().unwrap().outcome,
            RunOutcome::ToolNotFound
        );
        assert_eq!(controller.log(), [crate::runner::INSTALL_HINT.to_string()]);
        assert!(controller.status().ends_with("Could not run tests"));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_zero_records_success() {
        let mut controller = shell_controller("echo all good");
        controller.start_run(Path::new("/tmp/pkgA")).unwrap();

        assert_eq!(controller.wait_for_completion(), Some(RunOutcome::Success));
        assert_eq!(controller.log(), ["all good".to_string()]);
        assert!(controller.status().ends_with("All tests passed"));
        assert_eq!(controller.run_button_label(), "Run Tests");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_embeds_code_in_status() {
        let mut controller = shell_controller("exit 8");
        controller.start_run(Path::new("/tmp/pkgA")).unwrap();

        assert_eq!(controller.wait_for_completion(), Some(RunOutcome::Failure(8)));
        assert!(controller.status().contains("8"));
        assert!(controller.status().ends_with("Tests failed (exit code 8)"));
        assert_eq!(
            controller.history().latest().unwrap().title(),
            "❌ Tests failed (exit code 8)"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_start_run_clears_previous_log() {
        let mut controller = shell_controller("echo line");
        controller.start_run(Path::new("/tmp/pkgA")).unwrap();
        controller.wait_for_completion();
        controller.start_run(Path::new("/tmp/pkgA")).unwrap();
        controller.wait_for_completion();

        assert_eq!(controller.log(), ["line".to_string()]);
        assert_eq!(controller.history().len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_start_while_running_requests_stop() {
        let mut controller = shell_controller("exec sleep 30");
        assert_eq!(
            controller.start_run(Path::new("/tmp/pkgA")).unwrap(),
            RunAction::Started
        );
        assert_eq!(controller.run_button_label(), "Stop");

        assert_eq!(
            controller.start_run(Path::new("/tmp/pkgB")).unwrap(),
            RunAction::StopRequested
        );
        assert!(controller.is_stopping());
        assert_eq!(controller.status(), "Stopping tests...");

        let outcome = controller.wait_for_completion().unwrap();
        assert!(!outcome.is_success());
        assert_eq!(controller.history().len(), 1);
        assert!(!controller.is_running());
    }

    #[cfg(unix)]
    #[test]
    fn test_stop_then_natural_exit_records_one_entry() {
        let mut controller = shell_controller("echo one; echo two; exit 0");
        controller.start_run(Path::new("/tmp/pkgA")).unwrap();
        let _ = controller.request_stop();

        controller.wait_for_completion();
        // Nothing else may arrive afterwards
        assert!(controller.poll().is_empty());
        assert_eq!(controller.history().len(), 1);
        assert!(!controller.is_running());
    }

    #[test]
    fn test_wait_for_completion_when_idle_returns_none() {
        let mut controller = RunController::default();
        assert_eq!(controller.wait_for_completion(), None);
        assert!(controller.poll().is_empty());
    }

    #[test]
    fn test_set_backend_changes_tool_config() {
        let mut controller = RunController::default();
        controller.set_backend(Virtualization::Lxc);
        assert_eq!(controller.tool().backend, Virtualization::Lxc);
    }
}
