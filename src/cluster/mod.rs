// src/cluster/mod.rs

//! Working out which hosts a run covers.
//!
//! - [`status`] parses the failover service's status text.
//! - [`partner`] drives the "is it running / what is the status" queries.

pub mod partner;
pub mod status;

use tracing::debug;

use crate::errors::{CheckError, Result};
use crate::exec::runner::CommandRunner;

pub use partner::PartnerDiscovery;
pub use status::{parse_status, ClusterStatus};

/// Name of the node we are running on: the trimmed output of `hostname`.
pub async fn resolve_local_hostname<R: CommandRunner + ?Sized>(runner: &R) -> Result<String> {
    let name = runner.run_with_default("hostname").await?.text.trim().to_string();
    if name.is_empty() {
        return Err(CheckError::Protocol("`hostname` printed nothing".to_string()));
    }
    debug!(hostname = %name, "resolved local hostname");
    Ok(name)
}
