// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Suite runner framework.
//!
//! A runner launches one external process for a suite and hands back its
//! output, validated into a [`RawSuiteOutput`].

mod benchmark;
mod jest;
mod result;

pub use benchmark::{BenchmarkRunner, parse_benchmark_output};
pub use jest::{JestRunner, jest_args, parse_jest_json};
pub use result::{
    BenchmarkMetrics, ParsedOutput, RawSuiteOutput, RunnerOutput, Stats, SuiteError,
    SuiteResult, SuiteTotals,
};

use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, bounded};

use crate::config::SuiteConfig;
use crate::error::{Error, Result};

/// List of known runner names.
pub const RUNNER_NAMES: &[&str] = &["jest", "benchmark"];

/// Context passed to runners during execution.
#[derive(Debug, Clone, Copy)]
pub struct RunnerContext<'a> {
    /// Project root directory.
    pub root: &'a Path,
    /// Global parallel flag; combined with the suite's own flag.
    pub parallel: bool,
    /// Global coverage flag; combined with the suite's own flag.
    pub coverage: bool,
    /// Forward the suite's stderr live.
    pub verbose: bool,
}

impl RunnerContext<'_> {
    /// Workers are only used when both the run and the suite allow it.
    pub fn parallel_for(&self, suite: &SuiteConfig) -> bool {
        self.parallel && suite.parallel
    }

    /// Coverage is only collected when both the run and the suite ask for it.
    pub fn coverage_for(&self, suite: &SuiteConfig) -> bool {
        self.coverage && suite.coverage
    }
}

/// Trait for pluggable suite runners.
pub trait SuiteRunner: Send + Sync {
    /// Runner name as used in `runner = "..."`.
    fn name(&self) -> &'static str;

    /// Run the suite to completion.
    ///
    /// Failing tests are reported through the output, not as an error.
    /// Returns `Err` only when the process could not be started.
    fn run(&self, suite: &SuiteConfig, ctx: &RunnerContext<'_>) -> Result<RunnerOutput>;
}

/// Get all built-in runners.
pub fn all_runners() -> Vec<Arc<dyn SuiteRunner>> {
    vec![Arc::new(JestRunner), Arc::new(BenchmarkRunner)]
}

/// Get a runner by name from a runner set.
pub fn find_runner(runners: &[Arc<dyn SuiteRunner>], name: &str) -> Option<Arc<dyn SuiteRunner>> {
    runners.iter().find(|r| r.name() == name).cloned()
}

/// Build the command for a suite: its override, or the runner default.
pub fn suite_command(suite: &SuiteConfig, default: &[&str]) -> Command {
    let parts: Vec<String> = match &suite.command {
        Some(parts) if !parts.is_empty() => parts.clone(),
        _ => default.iter().map(|s| s.to_string()).collect(),
    };
    let mut cmd = Command::new(&parts[0]);
    cmd.args(&parts[1..]);
    cmd
}

/// Execute a setup command before running a suite.
///
/// Returns Ok(()) on success, Err(message) on failure.
pub fn run_setup_command(setup: &str, root: &Path) -> std::result::Result<(), String> {
    let (shell, flag) = if cfg!(target_os = "windows") {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    };
    let output = Command::new(shell)
        .args([flag, setup])
        .current_dir(root)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output();

    match output {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let stderr = String::from_utf8_lossy(&out.stderr);
            let truncated: String = stderr.lines().take(5).collect::<Vec<_>>().join("\n");
            Err(format!("setup command failed: {setup}\n{truncated}"))
        }
        Err(e) => Err(format!("failed to execute setup: {e}")),
    }
}

/// Format a timeout error message with runner-specific advice.
pub fn format_timeout_error(runner: &str, timeout: Duration) -> String {
    let base = format!("timed out after {:?}", timeout);
    let advice = match runner {
        "jest" => "check for unresolved promises or open handles",
        "benchmark" => "reduce iterations or raise the suite timeout",
        _ => "check for slow or hanging tests",
    };
    format!("{} - {}", base, advice)
}

/// Captured output of a child process.
#[derive(Debug)]
pub struct ProcessOutput {
    /// `None` when the process was killed after the timeout.
    pub status: Option<ExitStatus>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
    /// The deadline passed before the process and its output pipes finished.
    pub timed_out: bool,
}

impl ProcessOutput {
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.status.and_then(|s| s.code())
    }
}

/// How long to wait for output pipes to close after killing a process group.
const KILL_GRACE: Duration = Duration::from_millis(500);

/// Spawn a command with piped output, mapping startup failure to [`Error::Spawn`].
///
/// On unix the child leads its own process group so a timeout can reach
/// anything it started.
pub fn spawn(cmd: &mut Command) -> Result<Child> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| Error::Spawn { program, source })
}

/// Kill the child and every process in its group.
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;
        if let Err(e) = killpg(Pid::from_raw(child.id() as i32), Signal::SIGKILL) {
            tracing::debug!("killpg {} failed: {}", child.id(), e);
        }
    }
    child.kill().ok();
    child.wait().ok();
}

/// Wait for a child with a timeout, draining stdout and stderr concurrently.
///
/// Pipes are drained on reader threads so a chatty child cannot block on a
/// full pipe. When `echo_stderr` is set, stderr lines are forwarded to our
/// stderr as they arrive. The deadline covers both the child and its output
/// pipes: a background process that keeps the pipes open past the deadline
/// times the run out just like a hanging child. On timeout the whole process
/// group is killed and whatever output arrives within a short grace period
/// is kept.
pub fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
    echo_stderr: bool,
) -> io::Result<ProcessOutput> {
    let start = Instant::now();
    let deadline = start + timeout;
    let poll_interval = Duration::from_millis(50);

    let stdout_rx = child.stdout.take().map(|mut out| {
        let (tx, rx) = bounded(1);
        thread::spawn(move || {
            let mut buf = Vec::new();
            out.read_to_end(&mut buf).ok();
            tx.send(String::from_utf8_lossy(&buf).into_owned()).ok();
        });
        rx
    });
    let stderr_rx = child.stderr.take().map(|err| {
        let (tx, rx) = bounded(1);
        thread::spawn(move || {
            let mut collected = String::new();
            for line in BufReader::new(err).lines() {
                let Ok(line) = line else { break };
                if echo_stderr {
                    eprintln!("{line}");
                }
                collected.push_str(&line);
                collected.push('\n');
            }
            tx.send(collected).ok();
        });
        rx
    });

    let status = loop {
        match child.try_wait()? {
            Some(status) => break Some(status),
            None if Instant::now() >= deadline => {
                kill_tree(&mut child);
                break None;
            }
            None => thread::sleep(poll_interval),
        }
    };

    let mut timed_out = status.is_none();
    let mut stdout = collect(stdout_rx.as_ref(), deadline);
    let mut stderr = collect(stderr_rx.as_ref(), deadline);

    if stdout.is_none() || stderr.is_none() {
        if !timed_out {
            tracing::debug!("output pipes still open at deadline, killing process group");
            kill_tree(&mut child);
            timed_out = true;
        }
        let grace = Instant::now() + KILL_GRACE;
        stdout = stdout.or_else(|| collect(stdout_rx.as_ref(), grace));
        stderr = stderr.or_else(|| collect(stderr_rx.as_ref(), grace));
    }

    Ok(ProcessOutput {
        status,
        stdout: stdout.unwrap_or_default(),
        stderr: stderr.unwrap_or_default(),
        duration: start.elapsed(),
        timed_out,
    })
}

/// Receive a reader's output by `deadline`; a missing pipe yields empty output.
fn collect(rx: Option<&Receiver<String>>, deadline: Instant) -> Option<String> {
    match rx {
        Some(rx) => rx.recv_deadline(deadline).ok(),
        None => Some(String::new()),
    }
}

/// Spawn and wait for a suite process, shared by the built-in runners.
pub(crate) fn run_process(
    runner: &str,
    mut cmd: Command,
    suite: &SuiteConfig,
    ctx: &RunnerContext<'_>,
) -> Result<ProcessOutput> {
    cmd.current_dir(ctx.root);
    tracing::debug!("suite {}: running {:?}", suite.key, cmd);

    let child = spawn(&mut cmd)?;
    let output = wait_with_timeout(child, suite.timeout, ctx.verbose).map_err(|e| {
        Error::Internal(format!("failed to wait for {runner}: {e}"))
    })?;

    if output.timed_out() {
        tracing::warn!("suite {} timed out after {:?}", suite.key, suite.timeout);
    }
    Ok(output)
}

/// Convert finished process output into runner output.
pub(crate) fn runner_output(
    runner: &str,
    suite: &SuiteConfig,
    process: &ProcessOutput,
    raw: RawSuiteOutput,
) -> RunnerOutput {
    RunnerOutput {
        exit_code: process.exit_code(),
        duration: process.duration,
        timed_out: process.timed_out(),
        timeout_message: process
            .timed_out()
            .then(|| format_timeout_error(runner, suite.timeout)),
        raw,
        stderr: process.stderr.clone(),
    }
}

/// Runner output for a failed setup command.
pub(crate) fn setup_failed(message: String) -> RunnerOutput {
    RunnerOutput {
        exit_code: None,
        duration: Duration::ZERO,
        timed_out: false,
        timeout_message: None,
        raw: RawSuiteOutput::ExitCodeOnly,
        stderr: message,
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
