// src/errors.rs

//! Crate-wide error type.
//!
//! Only [`CheckError::NonZeroExit`] is recoverable: the dispatcher turns it
//! back into text for the host transcript. Everything else aborts the run.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("command timed out after {}s: {command}", timeout.as_secs_f64())]
    TimedOut { command: String, timeout: Duration },

    #[error("command exited with status {code}: {command}")]
    NonZeroExit {
        command: String,
        code: i32,
        output: String,
    },

    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("unexpected failover status output: {0}")]
    Protocol(String),

    #[error("interrupted")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CheckError {
    /// Whether the dispatch layer may swallow this error and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CheckError::NonZeroExit { .. })
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
