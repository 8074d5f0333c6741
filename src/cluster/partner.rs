// src/cluster/partner.rs

use tracing::{debug, info, warn};

use crate::cluster::status::{parse_status, ClusterStatus};
use crate::errors::{CheckError, Result};
use crate::exec::runner::CommandRunner;

/// Finds the other node of a failover pair by asking the local failover
/// service.
pub struct PartnerDiscovery<'r, R: ?Sized> {
    runner: &'r R,
    failover_cli: String,
}

impl<'r, R: CommandRunner + ?Sized> PartnerDiscovery<'r, R> {
    pub fn new(runner: &'r R, failover_cli: impl Into<String>) -> Self {
        Self {
            runner,
            failover_cli: failover_cli.into(),
        }
    }

    pub fn is_running_command(&self) -> String {
        format!("{} isrunning", self.failover_cli)
    }

    pub fn status_command(&self) -> String {
        format!("{} status", self.failover_cli)
    }

    /// Hostname of the partner of `this_node`, or `None` when the node is not
    /// part of a configured cluster.
    ///
    /// 1. Failover service not running (non-zero exit) → `None`.
    /// 2. Status text says the cluster is unconfigured → `None`.
    /// 3. Otherwise the first listed member other than `this_node`.
    ///
    /// Any other failure, including a status text without a state line, is
    /// an error.
    pub async fn discover(&self, this_node: &str) -> Result<Option<String>> {
        let is_running = self.is_running_command();
        match self.runner.run_with_default(&is_running).await {
            Ok(_) => debug!(cmd = %is_running, "failover service is running"),
            Err(CheckError::NonZeroExit { code, .. }) => {
                info!(exit_code = code, "failover service not running; checking this node only");
                return Ok(None);
            }
            Err(err) => return Err(err),
        }

        let status_cmd = self.status_command();
        let text = self.runner.run_with_default(&status_cmd).await?.text;
        let status = parse_status(&text);
        conclude(&status, this_node)
    }
}

fn conclude(status: &ClusterStatus, this_node: &str) -> Result<Option<String>> {
    let Some(state) = status.state.as_deref() else {
        return Err(CheckError::Protocol(
            "status output has no cluster state line".to_string(),
        ));
    };

    if status.is_unconfigured() {
        info!(state, "cluster is awaiting configuration; checking this node only");
        return Ok(None);
    }

    match status.partner_of(this_node) {
        Some(partner) => {
            info!(cluster = state, partner, "discovered cluster partner");
            Ok(Some(partner.to_string()))
        }
        None => {
            warn!(cluster = state, members = ?status.members, "no member other than this node");
            Ok(None)
        }
    }
}
