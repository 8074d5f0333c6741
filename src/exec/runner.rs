// src/exec/runner.rs

//! Bounded-time shell process runner.

use std::future::Future;
use std::io::Read;
use std::os::unix::process::ExitStatusExt;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::errors::{CheckError, Result};

/// Deadline used by callers that do not pick one themselves.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Output of a command that exited with status 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Combined stdout and stderr, in write order.
    pub text: String,
    pub exit_code: i32,
}

/// Boxed future returned by [`CommandRunner::run`].
pub type RunFuture<'a> = Pin<Box<dyn Future<Output = Result<ExecutionResult>> + Send + 'a>>;

/// Trait abstracting how a shell command line is executed.
///
/// Production code uses [`ShellRunner`]; tests provide a scripted runner that
/// records command lines instead of spawning processes.
pub trait CommandRunner: Send + Sync {
    /// Run `command` through a shell.
    ///
    /// - `timeout = None` waits for the process however long it takes.
    /// - On expiry the process tree is killed and [`CheckError::TimedOut`]
    ///   is returned; no output is kept.
    /// - A non-zero exit returns [`CheckError::NonZeroExit`] carrying the
    ///   full output.
    fn run<'a>(&'a self, command: &'a str, timeout: Option<Duration>) -> RunFuture<'a>;

    /// [`run`](Self::run) with [`DEFAULT_TIMEOUT`].
    fn run_with_default<'a>(&'a self, command: &'a str) -> RunFuture<'a> {
        self.run(command, Some(DEFAULT_TIMEOUT))
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run<'a>(&'a self, command: &'a str, timeout: Option<Duration>) -> RunFuture<'a> {
        (**self).run(command, timeout)
    }
}

/// Runs commands with `sh -c`, one process group per call.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::with_shell("sh")
    }

    /// Use a different POSIX shell binary.
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    async fn run_shell(&self, command: &str, timeout: Option<Duration>) -> Result<ExecutionResult> {
        debug!(cmd = %command, ?timeout, "starting shell process");

        // stdout and stderr share one pipe so the transcript keeps the
        // order the process wrote in.
        let (reader, writer) = std::io::pipe()?;
        let mut child = {
            let mut cmd = Command::new(&self.shell);
            cmd.arg("-c")
                .arg(command)
                .stdout(Stdio::from(writer.try_clone()?))
                .stderr(Stdio::from(writer))
                .process_group(0)
                .kill_on_drop(true);
            cmd.spawn().map_err(|source| CheckError::Spawn {
                command: command.to_string(),
                source,
            })?
            // `cmd` still owns our copies of the write end; dropping it here
            // is what lets the reader see EOF.
        };
        let pid = child.id();
        // Covers the caller dropping this future mid-run (Ctrl-C):
        // `kill_on_drop` only reaches the shell, not what it started.
        let mut group = GroupGuard::new(pid);

        let collector = tokio::task::spawn_blocking(move || -> std::io::Result<Vec<u8>> {
            let mut reader = reader;
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf)?;
            Ok(buf)
        });

        let completion = async {
            let status = child.wait().await?;
            let bytes = collector
                .await
                .map_err(|e| anyhow::anyhow!("output reader task failed: {e}"))??;
            Ok::<_, CheckError>((status, bytes))
        };

        // The deadline lives inside this call and is dropped with it.
        let outcome = match timeout {
            Some(limit) => tokio::time::timeout(limit, completion).await.ok(),
            None => Some(completion.await),
        };

        let Some(result) = outcome else {
            let limit = timeout.unwrap_or_default();
            warn!(cmd = %command, timeout_secs = limit.as_secs_f64(), "deadline expired; killing process group");
            terminate(&mut child, pid).await;
            group.disarm();
            return Err(CheckError::TimedOut {
                command: command.to_string(),
                timeout: limit,
            });
        };

        group.disarm();
        let (status, bytes) = result?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let code = exit_code(status);

        debug!(cmd = %command, exit_code = code, bytes = bytes.len(), "shell process exited");

        if status.success() {
            Ok(ExecutionResult {
                text,
                exit_code: 0,
            })
        } else {
            Err(CheckError::NonZeroExit {
                command: command.to_string(),
                code,
                output: text,
            })
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for ShellRunner {
    fn run<'a>(&'a self, command: &'a str, timeout: Option<Duration>) -> RunFuture<'a> {
        Box::pin(self.run_shell(command, timeout))
    }
}

/// Exit code as a shell would report it: `128 + signal` for a process
/// killed by a signal.
fn exit_code(status: ExitStatus) -> i32 {
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(-1)
}

/// SIGKILLs the child's process group on drop unless disarmed.
struct GroupGuard {
    pgid: Option<u32>,
}

impl GroupGuard {
    fn new(pgid: Option<u32>) -> Self {
        Self { pgid }
    }

    fn disarm(&mut self) {
        self.pgid = None;
    }
}

impl Drop for GroupGuard {
    fn drop(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            debug!(pgid, "run abandoned; killing process group");
            let _ = killpg(Pid::from_raw(pgid as i32), Signal::SIGKILL);
        }
    }
}

/// SIGKILL the child's process group, then reap the child.
async fn terminate(child: &mut Child, pid: Option<u32>) {
    if let Some(pid) = pid {
        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            debug!(pid, error = %e, "failed to signal process group");
        }
    }

    // `id()` is None once the child has been reaped.
    if child.id().is_some() {
        if let Err(e) = child.kill().await {
            warn!(error = %e, "failed to kill child process");
        }
    }
}
