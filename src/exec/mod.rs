// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`runner`] runs one shell command line with an optional deadline and
//!   classifies how it ended.
//! - [`channel`] wraps command batches for the four local/remote ×
//!   plain/managed channels and applies the dispatch error policy.

pub mod channel;
pub mod runner;

pub use channel::{shell_quote, Channel, ChannelDispatcher};
pub use runner::{CommandRunner, ExecutionResult, RunFuture, ShellRunner, DEFAULT_TIMEOUT};
