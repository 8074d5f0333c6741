// src/cluster/status.rs

//! Parser for the failover service's status text.
//!
//! Only two line shapes matter, everything else is ignored:
//!
//! ```text
//! Contacted localhost in cluster "ha-pair", 2 nodes, 1 service.
//! Host nodeA (10.0.0.1) UP, service startups enabled,
//! Host nodeB (10.0.0.2) UP, service startups enabled,
//! ```
//!
//! - `Contacted` lines: the 5th whitespace token is the cluster name, with
//!   commas and double quotes stripped.
//! - `Host` lines: the 2nd whitespace token is a member hostname.
//!
//! Lines may come in any order.

use tracing::debug;

/// First token of the line carrying the cluster name.
pub const STATE_KEYWORD: &str = "Contacted";
/// First token of each member line.
pub const HOST_KEYWORD: &str = "Host";
/// Cluster name of a node that has never been joined to a cluster.
pub const UNCONFIGURED_SENTINEL: &str = "Ready_For_Cluster_Config";

const STATE_COLUMN: usize = 4;
const HOST_COLUMN: usize = 1;

/// What the status text says about the cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterStatus {
    /// Cluster name from the first state line, if any.
    pub state: Option<String>,
    /// Member hostnames in the order listed.
    pub members: Vec<String>,
}

impl ClusterStatus {
    /// True when the state field says the node is waiting to be configured.
    pub fn is_unconfigured(&self) -> bool {
        self.state.as_deref() == Some(UNCONFIGURED_SENTINEL)
    }

    /// First member that is not `this_node`.
    pub fn partner_of(&self, this_node: &str) -> Option<&str> {
        self.members
            .iter()
            .map(String::as_str)
            .find(|member| *member != this_node)
    }
}

pub fn parse_status(text: &str) -> ClusterStatus {
    let mut status = ClusterStatus::default();

    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.first() {
            Some(&STATE_KEYWORD) if status.state.is_none() => {
                if let Some(raw) = tokens.get(STATE_COLUMN) {
                    status.state = Some(raw.replace([',', '"'], ""));
                }
            }
            Some(&STATE_KEYWORD) => {
                debug!(line, kept = ?status.state, "ignoring additional state line");
            }
            Some(&HOST_KEYWORD) => {
                if let Some(host) = tokens.get(HOST_COLUMN) {
                    status.members.push(host.to_string());
                }
            }
            _ => {}
        }
    }

    status
}
