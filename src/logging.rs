// src/logging.rs

//! Logging setup for `paircheck` using `tracing` + `tracing-subscriber`.
//!
//! Filter precedence:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `PAIRCHECK_LOG`, read as an `EnvFilter` directive list
//!    (e.g. `debug` or `paircheck::exec=trace,info`)
//! 3. `info`
//!
//! Logs go to STDERR; command output only ever goes to the host transcripts.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "PAIRCHECK_LOG";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV_VAR).ok();

    fmt()
        .with_env_filter(filter_for(cli_level, env.as_deref()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}

fn filter_for(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(lvl) = cli_level {
        return EnvFilter::new(directive(lvl));
    }
    env.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn directive(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
