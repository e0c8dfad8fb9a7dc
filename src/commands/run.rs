//! Run command handler.
//!
//! Runs autopkgtest against a package directory without opening a window.
//! Output is streamed to stdout as it arrives; Ctrl+C stops the run and a
//! second Ctrl+C abandons it.

use std::path::PathBuf;
use std::time::Duration;

use super::resolve_package_dir;
use crate::config::{SettingsStore, Virtualization};
use crate::controller::RunController;
use crate::error::{Result, RunnerError};
use crate::output::{print_info, print_run_result, print_tool_line, print_warning};
use crate::runner::{RunEvent, RunOutcome, ToolConfig};
use crate::signal::InterruptCounter;

/// How long the run loop waits for output before checking for interrupts.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Options for a headless run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Package directory to test.
    pub directory: PathBuf,
    /// Backend override; the stored setting is used when `None`.
    pub backend: Option<Virtualization>,
    /// Alternative test tool executable.
    pub tool: Option<PathBuf>,
}

/// Process exit code for a finished run.
///
/// 0 when the tests passed, 1 when they failed, 2 when they could not run.
pub fn exit_code_for(outcome: RunOutcome) -> i32 {
    match outcome {
        RunOutcome::Success => 0,
        RunOutcome::Failure(_) => 1,
        RunOutcome::ToolNotFound => 2,
    }
}

/// Run the tests and block until the tool has exited.
pub fn run_command(options: &RunOptions) -> Result<RunOutcome> {
    let directory = resolve_package_dir(&options.directory)?;
    let tool = tool_for(options, stored_backend());

    let mut controller = RunController::new(tool);
    let check = controller.select_directory(&directory);
    print_info(&check.status_message());

    let interrupts = InterruptCounter::install()?;
    controller.start_run(&directory)?;
    drive(&mut controller, &interrupts)
}

fn stored_backend() -> Virtualization {
    match SettingsStore::new().and_then(|store| store.load()) {
        Ok(settings) => settings.virtualization,
        Err(e) => {
            tracing::warn!(error = %e, "Using default settings");
            Virtualization::default()
        }
    }
}

fn tool_for(options: &RunOptions, stored: Virtualization) -> ToolConfig {
    let tool = ToolConfig::default().with_backend(options.backend.unwrap_or(stored));
    match options.tool.as_deref() {
        Some(program) => tool.with_program(program),
        None => tool,
    }
}

/// Pump controller events to the terminal until the run completes.
fn drive(controller: &mut RunController, interrupts: &InterruptCounter) -> Result<RunOutcome> {
    let mut stop_sent = false;

    loop {
        for event in controller.poll_timeout(POLL_INTERVAL) {
            match event {
                RunEvent::LineProduced(line) => print_tool_line(&line),
                RunEvent::RunCompleted(outcome) => {
                    if let Some(entry) = controller.history().latest() {
                        print_run_result(entry, controller.status());
                    }
                    return Ok(outcome);
                }
            }
        }

        if interrupts.force_requested() {
            // Dropping the controller stops the tool
            return Err(RunnerError::ProcessError(
                "Interrupted before the test tool exited".to_string(),
            ));
        }

        if interrupts.stop_requested() && !stop_sent {
            controller.request_stop()?;
            print_warning("Stopping tests (press Ctrl+C again to abandon)");
            stop_sent = true;
        }
    }
}
