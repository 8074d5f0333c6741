// src/lib.rs

pub mod cli;
pub mod cluster;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod plan;
pub mod sink;
pub mod types;

use std::future::Future;

use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::cluster::{resolve_local_hostname, PartnerDiscovery};
use crate::config::{load_and_validate, CheckSettings};
use crate::errors::{CheckError, Result};
use crate::exec::{ChannelDispatcher, CommandRunner, ShellRunner};
use crate::plan::{RunPlan, RunPlanner, RunReport};
use crate::sink::FileSinks;
use crate::types::HostSet;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and validation (fails before anything runs)
/// - local hostname + partner discovery
/// - the run plan, dispatcher and file transcripts
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)?;
    let settings = args.settings();
    let plan = RunPlan::from_config(&cfg);

    info!(
        config = %args.config.display(),
        commands = cfg.commands().len(),
        enabled = cfg.enabled_count(),
        "loaded command list"
    );

    if args.dry_run {
        print_dry_run(&plan, &settings);
        return Ok(());
    }

    let dispatcher = ChannelDispatcher::new(ShellRunner::new(), settings);

    let report = check_until(&dispatcher, &plan, tokio::signal::ctrl_c()).await?;

    print_compare_hint(&report);
    Ok(())
}

/// Resolve the hosts, then run `plan` on each of them and write the
/// transcripts under `settings.output_dir`.
pub async fn check<R: CommandRunner>(
    dispatcher: &ChannelDispatcher<R>,
    plan: &RunPlan,
) -> Result<RunReport> {
    let settings = dispatcher.settings();
    let hosts = resolve_hosts(dispatcher.runner(), settings).await?;
    info!(this_node = %hosts.this_node, that_node = ?hosts.that_node, "host set resolved");

    let mut sinks = FileSinks::new(&settings.output_dir, &settings.prefix);
    RunPlanner::new(dispatcher)
        .execute(plan, &hosts, &mut sinks)
        .await
}

/// [`check`], abandoned with [`CheckError::Interrupted`] as soon as
/// `shutdown` completes.
///
/// Abandoning drops the in-flight batch, which kills its process group.
pub async fn check_until<R, F>(
    dispatcher: &ChannelDispatcher<R>,
    plan: &RunPlan,
    shutdown: F,
) -> Result<RunReport>
where
    R: CommandRunner,
    F: Future,
{
    tokio::select! {
        res = check(dispatcher, plan) => res,
        _ = shutdown => {
            warn!("interrupted; abandoning run");
            Err(CheckError::Interrupted)
        }
    }
}

/// `this_node` from `--hostname` or `hostname`; `that_node` from partner
/// discovery unless `local_only` is set.
pub async fn resolve_hosts<R: CommandRunner + ?Sized>(
    runner: &R,
    settings: &CheckSettings,
) -> Result<HostSet> {
    let this_node = match &settings.hostname {
        Some(name) => name.clone(),
        None => resolve_local_hostname(runner).await?,
    };

    let that_node = if settings.local_only {
        debug!("local-only run; skipping partner discovery");
        None
    } else {
        PartnerDiscovery::new(runner, settings.failover_cli.as_str())
            .discover(&this_node)
            .await?
    };

    Ok(HostSet::new(this_node, that_node))
}

fn print_dry_run(plan: &RunPlan, settings: &CheckSettings) {
    println!("paircheck dry-run");
    println!("  output_dir = {}", settings.output_dir.display());
    println!("  prefix = {}", settings.prefix);
    println!("  columns = {}", settings.columns);
    match settings.batch_timeout {
        Some(t) => println!("  batch_timeout = {}s", t.as_secs()),
        None => println!("  batch_timeout = none"),
    }
    println!();

    println!("batches ({}):", plan.batches().len());
    for batch in plan.batches() {
        println!("  - {} ({} commands)", batch.kind, batch.commands.len());
        for cmd in &batch.commands {
            println!("      {cmd}");
        }
    }

    debug!("dry-run complete (no execution)");
}

fn print_compare_hint(report: &RunReport) {
    for host in &report.hosts {
        if let Some(path) = &host.location {
            println!("{}: {}", host.host, path.display());
        }
    }
    if let [a, b] = report.locations().as_slice() {
        println!("compare with: vimdiff {} {}", a.display(), b.display());
    }
}
