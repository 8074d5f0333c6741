// src/config/settings.rs

use std::path::PathBuf;
use std::time::Duration;

/// Default `COLUMNS` exported before the management shell runs, so its
/// tables are not wrapped at 80 characters.
pub const DEFAULT_COLUMNS: u16 = 200;

/// Default location of the failover service CLI.
pub const DEFAULT_FAILOVER_CLI: &str = "/opt/HAC/bin/rsfcli";

/// Everything a run needs besides the command list.
///
/// Built once from the CLI flags and handed to the dispatcher, partner
/// discovery and sink factory; nothing here is process-global.
#[derive(Debug, Clone)]
pub struct CheckSettings {
    /// Directory the per-host transcripts are written to.
    pub output_dir: PathBuf,
    /// Transcript names are `<prefix>-<host>.txt`.
    pub prefix: String,
    /// Terminal width exported for management-shell invocations.
    pub columns: u16,
    /// Program name of the cluster management shell.
    pub management_shell: String,
    /// Program used to reach the partner host (`ssh` or compatible).
    pub remote_shell: String,
    /// Extra arguments passed to `remote_shell` before the host name.
    pub remote_options: Vec<String>,
    /// Failover service CLI used for partner discovery.
    pub failover_cli: String,
    /// Deadline for each batch. `None` runs batches without a deadline.
    pub batch_timeout: Option<Duration>,
    /// Use this name instead of asking `hostname`.
    pub hostname: Option<String>,
    /// Skip partner discovery and only check the local node.
    pub local_only: bool,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            prefix: "paircheck".to_string(),
            columns: DEFAULT_COLUMNS,
            management_shell: "nmc".to_string(),
            remote_shell: "ssh".to_string(),
            remote_options: Vec::new(),
            failover_cli: DEFAULT_FAILOVER_CLI.to_string(),
            batch_timeout: None,
            hostname: None,
            local_only: false,
        }
    }
}
