// src/plan/planner.rs

use std::io::Write;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::errors::Result;
use crate::exec::channel::{Channel, ChannelDispatcher};
use crate::exec::runner::CommandRunner;
use crate::plan::batch::RunPlan;
use crate::sink::{Sink, SinkFactory};
use crate::types::HostSet;

/// What was written for one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostReport {
    pub host: String,
    pub local: bool,
    pub batches: usize,
    pub location: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub hosts: Vec<HostReport>,
}

impl RunReport {
    /// Transcript files, in host order.
    pub fn locations(&self) -> Vec<&PathBuf> {
        self.hosts.iter().filter_map(|h| h.location.as_ref()).collect()
    }
}

/// Runs every batch of a [`RunPlan`] on every host and writes the results
/// to that host's sink.
pub struct RunPlanner<'d, R> {
    dispatcher: &'d ChannelDispatcher<R>,
}

impl<'d, R: CommandRunner> RunPlanner<'d, R> {
    pub fn new(dispatcher: &'d ChannelDispatcher<R>) -> Self {
        Self { dispatcher }
    }

    /// Execute `plan` strictly sequentially: hosts in [`HostSet::iter`]
    /// order, batches in plan order.
    ///
    /// All sinks are opened before the first batch runs. They are released
    /// when this returns, whether or not an error cut the run short.
    pub async fn execute<S: SinkFactory>(
        &self,
        plan: &RunPlan,
        hosts: &HostSet,
        sinks: &mut S,
    ) -> Result<RunReport> {
        if plan.is_empty() {
            warn!("no enabled commands; transcripts will be empty");
        }

        let mut opened: Vec<(&str, Sink)> = Vec::with_capacity(hosts.len());
        for host in hosts.iter() {
            opened.push((host, sinks.open(host)?));
        }

        let mut report = RunReport::default();
        for (host, sink) in &mut opened {
            let host: &str = host;
            let local = hosts.is_local(host);
            info!(host = %host, local, batches = plan.batches().len(), "checking host");

            for batch in plan.batches() {
                let channel = Channel::select(batch.kind, host, &hosts.this_node);
                let text = self.dispatcher.dispatch(&channel, &batch.script()).await?;
                sink.write_all(text.as_bytes())?;
                sink.write_all(b"\n")?;
            }
            sink.flush()?;

            report.hosts.push(HostReport {
                host: host.to_string(),
                local,
                batches: plan.batches().len(),
                location: sinks.location(host),
            });
        }

        Ok(report)
    }
}
