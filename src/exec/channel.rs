// src/exec/channel.rs

//! The four execution channels and the dispatcher that runs them.
//!
//! A channel only decides how a command line is wrapped; the wrapped text is
//! always handed to the same [`CommandRunner`]:
//!
//! | channel          | shell text                                                  |
//! |------------------|-------------------------------------------------------------|
//! | `LocalPlain`     | `<cmd>`                                                     |
//! | `LocalManaged`   | `export COLUMNS=<n>; nmc -c '<cmd>'`                        |
//! | `RemotePlain`    | `ssh <host> '<cmd>'`                                        |
//! | `RemoteManaged`  | `ssh -tt <host> 'export COLUMNS=<n>; nmc -c ...'`           |

use tracing::{debug, error, info};

use crate::config::CheckSettings;
use crate::errors::{CheckError, Result};
use crate::exec::runner::CommandRunner;
use crate::types::CommandKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel<'h> {
    LocalPlain,
    LocalManaged,
    RemotePlain { host: &'h str },
    RemoteManaged { host: &'h str },
}

impl<'h> Channel<'h> {
    /// Pick the channel for a batch of `kind` on `host`.
    ///
    /// Local iff `host` is the node we are running on.
    pub fn select(kind: CommandKind, host: &'h str, this_node: &str) -> Self {
        let local = host == this_node;
        match (kind, local) {
            (CommandKind::Shell, true) => Channel::LocalPlain,
            (CommandKind::ManagementShell, true) => Channel::LocalManaged,
            (CommandKind::Shell, false) => Channel::RemotePlain { host },
            (CommandKind::ManagementShell, false) => Channel::RemoteManaged { host },
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Channel::LocalPlain | Channel::LocalManaged)
    }

    /// Build the shell text that runs `command` over this channel.
    pub fn wrap(&self, command: &str, settings: &CheckSettings) -> String {
        match self {
            Channel::LocalPlain => command.to_string(),
            Channel::LocalManaged => managed(command, settings),
            Channel::RemotePlain { host } => remote(host, false, command, settings),
            Channel::RemoteManaged { host } => {
                remote(host, true, &managed(command, settings), settings)
            }
        }
    }
}

fn managed(command: &str, settings: &CheckSettings) -> String {
    format!(
        "export COLUMNS={}; {} -c {}",
        settings.columns,
        settings.management_shell,
        shell_quote(command)
    )
}

fn remote(host: &str, tty: bool, command: &str, settings: &CheckSettings) -> String {
    let mut parts = vec![settings.remote_shell.clone()];
    parts.extend(settings.remote_options.iter().cloned());
    // The management shell only behaves with a terminal on the far side;
    // `-tt` forces one even though our stdin is not a tty.
    if tty {
        parts.push("-tt".to_string());
    }
    parts.push(host.to_string());
    parts.push(shell_quote(command));
    parts.join(" ")
}

/// Quote `s` as a single POSIX shell word.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Runs command batches over the right channel and applies the dispatch
/// error policy.
pub struct ChannelDispatcher<R> {
    runner: R,
    settings: CheckSettings,
}

impl<R: CommandRunner> ChannelDispatcher<R> {
    pub fn new(runner: R, settings: CheckSettings) -> Self {
        Self { runner, settings }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn settings(&self) -> &CheckSettings {
        &self.settings
    }

    /// Run `command` over `channel` and return the text for the transcript.
    ///
    /// - `NonZeroExit` is logged and its output returned: a failing
    ///   diagnostic command is still a useful diagnostic.
    /// - Any other error is logged and returned; callers abort the run.
    pub async fn dispatch(&self, channel: &Channel<'_>, command: &str) -> Result<String> {
        let wrapped = channel.wrap(command, &self.settings);
        info!(?channel, cmd = %command, "dispatching batch");
        debug!(wrapped = %wrapped, "wrapped command line");

        match self.runner.run(&wrapped, self.settings.batch_timeout).await {
            Ok(res) => Ok(res.text),
            Err(CheckError::NonZeroExit { code, output, .. }) => {
                error!(
                    ?channel,
                    exit_code = code,
                    cmd = %command,
                    "batch exited with non-zero status; keeping its output"
                );
                Ok(output)
            }
            Err(err) => {
                error!(?channel, cmd = %command, error = %err, "batch failed; aborting run");
                Err(err)
            }
        }
    }
}
