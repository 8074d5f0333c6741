// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;
use crate::config::settings::{CheckSettings, DEFAULT_COLUMNS, DEFAULT_FAILOVER_CLI};

/// Command-line arguments for `paircheck`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "paircheck",
    version,
    about = "Run a battery of diagnostic commands on this node and its cluster partner.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the command list (JSON).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Directory for the per-host transcripts (created if missing).
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Transcripts are named `<prefix>-<host>.txt`.
    #[arg(long, value_name = "NAME", default_value = "paircheck")]
    pub prefix: String,

    /// Terminal width exported for management-shell commands.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_COLUMNS)]
    pub columns: u16,

    /// Use this as the local node name instead of running `hostname`.
    #[arg(long, value_name = "NAME")]
    pub hostname: Option<String>,

    /// Only check this node; skip partner discovery.
    #[arg(long)]
    pub local_only: bool,

    /// Failover service CLI used to discover the partner node.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_FAILOVER_CLI)]
    pub failover_cli: String,

    /// Cluster management shell invoked for `nmc` commands.
    #[arg(long, value_name = "PROG", default_value = "nmc")]
    pub management_shell: String,

    /// Program used to run commands on the partner node.
    #[arg(long, value_name = "PROG", default_value = "ssh")]
    pub remote_shell: String,

    /// Extra option for the remote shell (repeatable), e.g. `-o BatchMode=yes`.
    #[arg(long = "remote-opt", value_name = "OPT", allow_hyphen_values = true)]
    pub remote_options: Vec<String>,

    /// Kill a batch that runs longer than this many seconds.
    ///
    /// Without this flag batches run without a deadline.
    #[arg(long, value_name = "SECS")]
    pub batch_timeout: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PAIRCHECK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate and print the batches, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    pub fn settings(&self) -> CheckSettings {
        CheckSettings {
            output_dir: self.output_dir.clone(),
            prefix: self.prefix.clone(),
            columns: self.columns,
            management_shell: self.management_shell.clone(),
            remote_shell: self.remote_shell.clone(),
            remote_options: self.remote_options.clone(),
            failover_cli: self.failover_cli.clone(),
            batch_timeout: self.batch_timeout.map(Duration::from_secs),
            hostname: self.hostname.clone(),
            local_only: self.local_only,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
