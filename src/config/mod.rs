// src/config/mod.rs

//! Configuration loading and validation for paircheck.
//!
//! Responsibilities:
//! - Define the JSON-backed command list (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate command types before anything runs (`validate.rs`).
//! - Hold the explicit run settings built from CLI flags (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, parse_and_validate};
pub use model::{ConfigFile, RawCommandEntry, RawConfigFile};
pub use settings::CheckSettings;
