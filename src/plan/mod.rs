// src/plan/mod.rs

//! Grouping commands into batches and running them per host.
//!
//! - [`batch`] builds the [`RunPlan`] from the validated config.
//! - [`planner`] walks hosts × batches and writes each host's transcript.

pub mod batch;
pub mod planner;

pub use batch::{Batch, RunPlan, ERREXIT_PRELUDE, MANAGED_SEPARATOR, STATEMENT_SEPARATOR};
pub use planner::{HostReport, RunPlanner, RunReport};
