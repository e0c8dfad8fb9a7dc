//! External test process execution.
//!
//! A run spawns `autopkgtest <directory> -- <backend>` on a dedicated worker
//! thread. stdout and stderr share a single pipe so lines arrive in the order
//! the tool wrote them. Every observable effect is sent to the owning thread
//! as a [`RunEvent`]; the worker never touches presentation state.

use std::ffi::{OsStr, OsString};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::Virtualization;
use crate::error::{Result, RunnerError};

/// Program launched when no other tool is configured.
pub const DEFAULT_TOOL: &str = "autopkgtest";

/// Log line emitted when the tool executable cannot be found.
pub const INSTALL_HINT: &str =
    "autopkgtest not installed. Install with: sudo apt install autopkgtest";

/// How often the worker polls for child exit once output has ended.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How long a stopped run may take to exit after SIGTERM before its process
/// group is killed.
pub const STOP_GRACE_PERIOD: Duration = Duration::from_secs(10);

// ============================================================================
// Outcome and Events
// ============================================================================

/// Terminal classification of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The tool exited with code 0.
    Success,
    /// The tool exited with a nonzero code, or was killed by a signal
    /// (reported as the negated signal number).
    Failure(i32),
    /// The tool could not be started, or the run hit an unexpected fault.
    ToolNotFound,
}

impl RunOutcome {
    /// Classify a process exit code.
    pub fn from_exit_code(code: i32) -> Self {
        if code == 0 {
            RunOutcome::Success
        } else {
            RunOutcome::Failure(code)
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, RunOutcome::Success)
    }

    /// Human-readable status text.
    pub fn status_text(self) -> String {
        match self {
            RunOutcome::Success => "All tests passed".to_string(),
            RunOutcome::Failure(code) => format!("Tests failed (exit code {})", code),
            RunOutcome::ToolNotFound => "Could not run tests".to_string(),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            RunOutcome::Success => "✅",
            RunOutcome::Failure(_) => "❌",
            RunOutcome::ToolNotFound => "⚠️",
        }
    }
}

/// Messages sent from the run worker to the owning thread, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// One line of combined tool output, without its line terminator.
    LineProduced(String),
    /// The run is over. Sent exactly once, always last.
    RunCompleted(RunOutcome),
}

// ============================================================================
// Tool Configuration
// ============================================================================

/// How to invoke the external test tool.
///
/// The final command line is
/// `<program> <leading_args...> <directory> -- <backend>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub program: OsString,
    pub leading_args: Vec<OsString>,
    pub backend: Virtualization,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: OsString::from(DEFAULT_TOOL),
            leading_args: Vec::new(),
            backend: Virtualization::default(),
        }
    }
}

impl ToolConfig {
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments placed before the package directory.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_backend(mut self, backend: Virtualization) -> Self {
        self.backend = backend;
        self
    }

    /// Full argument list for a run against `directory`.
    pub fn args_for(&self, directory: &Path) -> Vec<OsString> {
        let mut args = self.leading_args.clone();
        args.push(directory.as_os_str().to_owned());
        args.push(OsString::from("--"));
        args.push(OsString::from(self.backend.as_arg()));
        args
    }

    fn command_for(&self, directory: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.args(self.args_for(directory));
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own process group, so a stop reaches every helper the tool forks
            command.process_group(0);
        }
        command
    }

    fn program_name(&self) -> &OsStr {
        &self.program
    }
}

// ============================================================================
// Process Handle
// ============================================================================

/// Shared handle to the process group of one run.
///
/// The worker stores the child here once spawned. The owning thread uses
/// [`ProcessHandle::request_stop`] to raise the cancellation flag and signal
/// the tool, even while the worker is blocked on a read. The tool runs in its
/// own process group so helpers that inherited the output pipe are signalled
/// along with it.
#[derive(Clone)]
pub struct ProcessHandle {
    child: Arc<Mutex<Option<Child>>>,
    /// Process group id of the run, 0 until the child is spawned.
    group: Arc<AtomicU32>,
    cancelled: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    grace_period: Duration,
}

impl Default for ProcessHandle {
    fn default() -> Self {
        Self {
            child: Arc::default(),
            group: Arc::default(),
            cancelled: Arc::default(),
            finished: Arc::default(),
            grace_period: STOP_GRACE_PERIOD,
        }
    }
}

impl ProcessHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time a stopped run gets to exit after SIGTERM before it is killed.
    #[cfg(test)]
    fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Raise the cancellation flag and ask the tool to exit.
    ///
    /// SIGTERM goes to the whole process group so autopkgtest can tear down
    /// its testbed; whatever is still alive after the grace period gets
    /// SIGKILL. Safe to call more than once. Returns `Ok(true)` if a live
    /// process group was signalled.
    pub fn request_stop(&self) -> Result<bool> {
        self.stop().map_err(|e| {
            RunnerError::ProcessError(format!("Failed to stop test process: {}", e))
        })
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Whether the worker has reaped the tool and read all of its output.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    fn stop(&self) -> io::Result<bool> {
        let first_request = !self.cancelled.swap(true, Ordering::SeqCst);
        let signalled = self.terminate()?;
        if signalled && first_request {
            self.schedule_kill();
        }
        Ok(signalled)
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Option<Child>>> {
        self.child
            .lock()
            .map_err(|e| io::Error::other(format!("process handle lock poisoned: {}", e)))
    }

    /// Store the spawned child. A stop that raced the spawn is honoured here.
    fn set_child(&self, child: Child) -> io::Result<()> {
        let group = child.id();
        let mut guard = self.lock()?;
        *guard = Some(child);
        self.group.store(group, Ordering::SeqCst);
        drop(guard);

        if self.is_cancelled() && self.terminate()? {
            self.schedule_kill();
        }
        Ok(())
    }

    fn mark_finished(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }

    /// Kill the process group once the grace period has passed, unless the
    /// run finishes first.
    fn schedule_kill(&self) {
        let handle = self.clone();
        let spawned = thread::Builder::new()
            .name("autopkgtest-stop".to_string())
            .spawn(move || handle.kill_after_grace_period());

        if let Err(e) = spawned {
            tracing::warn!(error = %e, "Could not start stop timer, killing test process now");
            if let Err(e) = self.force_kill() {
                tracing::warn!(error = %e, "Failed to kill test process");
            }
        }
    }

    fn kill_after_grace_period(&self) {
        let deadline = Instant::now() + self.grace_period;
        while Instant::now() < deadline {
            if self.is_finished() {
                return;
            }
            thread::sleep(WAIT_POLL_INTERVAL);
        }

        match self.force_kill() {
            Ok(true) => tracing::warn!(
                grace_period = ?self.grace_period,
                "Test process did not exit after SIGTERM, killed"
            ),
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to kill test process"),
        }
    }

    #[cfg(unix)]
    fn terminate(&self) -> io::Result<bool> {
        self.signal_group(libc::SIGTERM)
    }

    #[cfg(unix)]
    fn force_kill(&self) -> io::Result<bool> {
        self.signal_group(libc::SIGKILL)
    }

    #[cfg(unix)]
    fn signal_group(&self, signal: libc::c_int) -> io::Result<bool> {
        let group = self.group.load(Ordering::SeqCst);
        if group == 0 || self.is_finished() {
            return Ok(false);
        }

        // SAFETY: killpg only delivers a signal; the group id is our child's pid.
        if unsafe { libc::killpg(group as libc::pid_t, signal) } == -1 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::ESRCH) {
                return Ok(false);
            }
            return Err(err);
        }
        Ok(true)
    }

    #[cfg(not(unix))]
    fn terminate(&self) -> io::Result<bool> {
        self.kill_child()
    }

    #[cfg(not(unix))]
    fn force_kill(&self) -> io::Result<bool> {
        self.kill_child()
    }

    #[cfg(not(unix))]
    fn kill_child(&self) -> io::Result<bool> {
        let mut guard = self.lock()?;
        let Some(child) = guard.as_mut() else {
            return Ok(false);
        };
        match child.kill() {
            Ok(()) => Ok(true),
            // Already exited but not yet reaped
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Wait for the child to exit and reap it.
    ///
    /// Polls instead of blocking in `wait` so the lock stays free for
    /// [`ProcessHandle::request_stop`].
    fn wait(&self) -> io::Result<ExitStatus> {
        loop {
            {
                let mut guard = self.lock()?;
                let child = guard
                    .as_mut()
                    .ok_or_else(|| io::Error::other("test process handle missing"))?;
                if let Some(status) = child.try_wait()? {
                    guard.take();
                    return Ok(status);
                }
            }
            thread::sleep(WAIT_POLL_INTERVAL);
        }
    }
}

// ============================================================================
// Worker
// ============================================================================

/// Why a run ended without an exit status.
enum RunFault {
    ToolMissing,
    Io(io::Error),
}

impl From<io::Error> for RunFault {
    fn from(e: io::Error) -> Self {
        RunFault::Io(e)
    }
}

/// Start the worker thread for one run.
///
/// The worker sends any number of [`RunEvent::LineProduced`] followed by
/// exactly one [`RunEvent::RunCompleted`].
pub fn spawn_worker(
    tool: ToolConfig,
    directory: PathBuf,
    handle: ProcessHandle,
    events: Sender<RunEvent>,
) -> Result<JoinHandle<()>> {
    let worker = thread::Builder::new()
        .name("autopkgtest-run".to_string())
        .spawn(move || {
            let outcome = execute(&tool, &directory, &handle, &events);
            handle.mark_finished();
            let _ = events.send(RunEvent::RunCompleted(outcome));
        })?;
    Ok(worker)
}

/// Run the tool to completion and classify the result.
fn execute(
    tool: &ToolConfig,
    directory: &Path,
    handle: &ProcessHandle,
    events: &Sender<RunEvent>,
) -> RunOutcome {
    tracing::info!(
        program = ?tool.program_name(),
        directory = %directory.display(),
        backend = %tool.backend,
        "Starting test run"
    );

    match run_process(tool, directory, handle, events) {
        Ok(status) => {
            let code = exit_code(status);
            tracing::info!(code, cancelled = handle.is_cancelled(), "Test process exited");
            RunOutcome::from_exit_code(code)
        }
        Err(RunFault::ToolMissing) => {
            tracing::warn!(program = ?tool.program_name(), "Test tool not found");
            let _ = events.send(RunEvent::LineProduced(INSTALL_HINT.to_string()));
            RunOutcome::ToolNotFound
        }
        Err(RunFault::Io(e)) => {
            tracing::warn!(error = %e, "Test run failed");
            let _ = events.send(RunEvent::LineProduced(e.to_string()));
            RunOutcome::ToolNotFound
        }
    }
}

fn run_process(
    tool: &ToolConfig,
    directory: &Path,
    handle: &ProcessHandle,
    events: &Sender<RunEvent>,
) -> std::result::Result<ExitStatus, RunFault> {
    let (reader, writer) = io::pipe()?;

    let mut command = tool.command_for(directory);
    command
        .stdin(Stdio::null())
        .stdout(writer.try_clone()?)
        .stderr(writer);

    let child = command.spawn().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => RunFault::ToolMissing,
        _ => RunFault::Io(e),
    })?;
    // The command still owns the parent's copies of the write end; EOF
    // never arrives until they are closed.
    drop(command);

    handle.set_child(child)?;

    let forwarded = forward_lines(BufReader::new(reader), handle, events);
    if forwarded.is_err() {
        let _ = handle.stop();
    }
    let status = handle.wait()?;
    forwarded?;
    Ok(status)
}

/// Forward output lines until EOF.
///
/// The cancellation flag is checked after every read. Once it is raised the
/// pipe is still drained, so a tool cleaning up after SIGTERM never blocks on
/// a full pipe, but nothing more is forwarded.
fn forward_lines<R: BufRead>(
    mut reader: R,
    handle: &ProcessHandle,
    events: &Sender<RunEvent>,
) -> io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }

        if handle.is_cancelled() {
            continue;
        }

        if events.send(RunEvent::LineProduced(decode_line(&buf))).is_err() {
            // Nobody is listening any more
            handle.stop()?;
        }
    }
}

/// Decode one raw output line, replacing invalid UTF-8.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// Exit code of a finished process; signal deaths map to `-signal`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{self, Receiver};
    use std::time::Instant;

    const EVENT_TIMEOUT: Duration = Duration::from_secs(10);

    fn shell_tool(script: &str) -> ToolConfig {
        ToolConfig::default()
            .with_program("sh")
            .with_leading_args(["-c", script, "fake-autopkgtest"])
    }

    fn collect(rx: &Receiver<RunEvent>) -> (Vec<String>, RunOutcome) {
        let mut lines = Vec::new();
        loop {
            match rx.recv_timeout(EVENT_TIMEOUT).expect("worker event") {
                RunEvent::LineProduced(line) => lines.push(line),
                RunEvent::RunCompleted(outcome) => return (lines, outcome),
            }
        }
    }

    fn run_to_end(tool: ToolConfig) -> (Vec<String>, RunOutcome) {
        let (tx, rx) = mpsc::channel();
        let worker = spawn_worker(tool, PathBuf::from("/tmp/pkg"), ProcessHandle::new(), tx)
            .unwrap();
        let result = collect(&rx);
        worker.join().unwrap();
        assert!(rx.try_recv().is_err(), "no events after RunCompleted");
        result
    }

    #[test]
    fn test_outcome_from_exit_code() {
        assert_eq!(RunOutcome::from_exit_code(0), RunOutcome::Success);
        assert_eq!(RunOutcome::from_exit_code(4), RunOutcome::Failure(4));
        assert_eq!(RunOutcome::from_exit_code(-15), RunOutcome::Failure(-15));
    }

    #[test]
    fn test_outcome_status_text_embeds_exit_code() {
        assert_eq!(RunOutcome::Success.status_text(), "All tests passed");
        assert_eq!(
            RunOutcome::Failure(12).status_text(),
            "Tests failed (exit code 12)"
        );
        assert_eq!(RunOutcome::ToolNotFound.status_text(), "Could not run tests");
    }

    #[test]
    fn test_default_tool_args() {
        let args = ToolConfig::default().args_for(Path::new("/tmp/pkgA"));
        assert_eq!(args, vec!["/tmp/pkgA", "--", "null"]);
        assert_eq!(ToolConfig::default().program, DEFAULT_TOOL);
    }

    #[test]
    fn test_tool_args_with_leading_args_and_backend() {
        let tool = ToolConfig::default()
            .with_leading_args(["--shell-fail"])
            .with_backend(Virtualization::Qemu);
        let args = tool.args_for(Path::new("pkg"));
        assert_eq!(args, vec!["--shell-fail", "pkg", "--", "qemu"]);
    }

    #[test]
    fn test_decode_line_strips_terminators_and_replaces_invalid_utf8() {
        assert_eq!(decode_line(b"hello\n"), "hello");
        assert_eq!(decode_line(b"hello\r\n"), "hello");
        assert_eq!(decode_line(b"no newline"), "no newline");
        assert_eq!(decode_line(b"bad \xff byte\n"), "bad \u{fffd} byte");
    }

    #[test]
    fn test_missing_tool_reports_install_hint() {
        let tool = ToolConfig::default().with_program("autopkgtest-runner-no-such-tool");
        let (lines, outcome) = run_to_end(tool);

        assert_eq!(outcome, RunOutcome::ToolNotFound);
        assert_eq!(lines, vec![INSTALL_HINT.to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_fault_is_reported_with_raw_message() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        // A directory is not executable: spawn fails with permission denied
        let tool = ToolConfig::default().with_program(temp_dir.path());
        let (lines, outcome) = run_to_end(tool);

        assert_eq!(outcome, RunOutcome::ToolNotFound);
        assert_eq!(lines.len(), 1);
        assert_ne!(lines[0], INSTALL_HINT);
    }

    #[cfg(unix)]
    #[test]
    fn test_success_streams_lines_in_order() {
        let (lines, outcome) = run_to_end(shell_tool("echo one; echo two; echo three"));

        assert_eq!(outcome, RunOutcome::Success);
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_receives_directory_and_backend() {
        let (lines, _) = run_to_end(shell_tool("echo \"$1|$2|$3\""));
        assert_eq!(lines, vec!["/tmp/pkg|--|null"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_stderr_is_merged_in_order() {
        let (lines, outcome) =
            run_to_end(shell_tool("echo out1; echo err1 >&2; echo out2; echo err2 >&2"));

        assert_eq!(outcome, RunOutcome::Success);
        assert_eq!(lines, vec!["out1", "err1", "out2", "err2"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_failure_with_code() {
        let (lines, outcome) = run_to_end(shell_tool("echo failing; exit 4"));

        assert_eq!(outcome, RunOutcome::Failure(4));
        assert_eq!(lines, vec!["failing"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_invalid_utf8_does_not_fail_run() {
        let (lines, outcome) = run_to_end(shell_tool("printf 'ok \\377\\n'; exit 0"));

        assert_eq!(outcome, RunOutcome::Success);
        assert_eq!(lines, vec!["ok \u{fffd}"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_final_line_without_newline_is_delivered() {
        let (lines, _) = run_to_end(shell_tool("printf 'a\\nb'"));
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_request_stop_kills_silent_process() {
        let (tx, rx) = mpsc::channel();
        let handle = ProcessHandle::new();
        let worker = spawn_worker(
            shell_tool("echo started; exec sleep 30"),
            PathBuf::from("/tmp/pkg"),
            handle.clone(),
            tx,
        )
        .unwrap();

        assert_eq!(
            rx.recv_timeout(EVENT_TIMEOUT).unwrap(),
            RunEvent::LineProduced("started".to_string())
        );

        let started = Instant::now();
        handle.request_stop().unwrap();
        let (lines, outcome) = collect(&rx);
        worker.join().unwrap();

        assert!(lines.is_empty());
        assert_eq!(outcome, RunOutcome::Failure(-libc::SIGTERM));
        assert!(started.elapsed() < STOP_GRACE_PERIOD);
        assert!(handle.is_finished());
    }

    #[cfg(unix)]
    #[test]
    fn test_request_stop_reaches_helpers_holding_the_pipe() {
        let (tx, rx) = mpsc::channel();
        let handle = ProcessHandle::new();
        // The shell's foreground sleep inherits the output pipe
        let worker = spawn_worker(
            shell_tool("trap 'echo cleanup >&2; exit 143' TERM; echo started; sleep 30; echo done"),
            PathBuf::from("/tmp/pkg"),
            handle.clone(),
            tx,
        )
        .unwrap();

        assert_eq!(
            rx.recv_timeout(EVENT_TIMEOUT).unwrap(),
            RunEvent::LineProduced("started".to_string())
        );

        let started = Instant::now();
        handle.request_stop().unwrap();
        let (lines, outcome) = collect(&rx);
        worker.join().unwrap();

        // The TERM trap ran, so the tool got to clean up
        assert_eq!(outcome, RunOutcome::Failure(143));
        assert!(lines.is_empty());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_request_stop_reaches_background_helpers() {
        let (tx, rx) = mpsc::channel();
        let handle = ProcessHandle::new();
        let worker = spawn_worker(
            shell_tool("sleep 30 & echo started; wait"),
            PathBuf::from("/tmp/pkg"),
            handle.clone(),
            tx,
        )
        .unwrap();

        assert_eq!(
            rx.recv_timeout(EVENT_TIMEOUT).unwrap(),
            RunEvent::LineProduced("started".to_string())
        );

        let started = Instant::now();
        handle.request_stop().unwrap();
        let (_, outcome) = collect(&rx);
        worker.join().unwrap();

        assert!(!outcome.is_success());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_ignoring_sigterm_is_killed_after_grace_period() {
        let (tx, rx) = mpsc::channel();
        let handle = ProcessHandle::new().with_grace_period(Duration::from_millis(200));
        let worker = spawn_worker(
            shell_tool("trap '' TERM; echo started; sleep 30"),
            PathBuf::from("/tmp/pkg"),
            handle.clone(),
            tx,
        )
        .unwrap();

        assert_eq!(
            rx.recv_timeout(EVENT_TIMEOUT).unwrap(),
            RunEvent::LineProduced("started".to_string())
        );

        let started = Instant::now();
        handle.request_stop().unwrap();
        let (_, outcome) = collect(&rx);
        worker.join().unwrap();

        assert_eq!(outcome, RunOutcome::Failure(-libc::SIGKILL));
        assert!(started.elapsed() >= Duration::from_millis(200));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_request_stop_before_spawn_kills_child_immediately() {
        let (tx, rx) = mpsc::channel();
        let handle = ProcessHandle::new();
        handle.request_stop().unwrap();

        let worker = spawn_worker(
            shell_tool("exec sleep 30"),
            PathBuf::from("/tmp/pkg"),
            handle.clone(),
            tx,
        )
        .unwrap();
        let (lines, outcome) = collect(&rx);
        worker.join().unwrap();

        assert!(lines.is_empty());
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_request_stop_without_child_is_noop() {
        let handle = ProcessHandle::new();
        assert!(!handle.request_stop().unwrap());
        assert!(handle.is_cancelled());
        assert!(!handle.is_finished());
    }
}
