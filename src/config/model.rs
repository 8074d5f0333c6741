// src/config/model.rs

use serde::Deserialize;

use crate::types::Command;

/// Config file exactly as read from JSON, before type validation.
///
/// ```json
/// [
///   { "type": "bash", "cmd": "uname -a", "enabled": true },
///   { "type": "nmc",  "cmd": "show appliance version" }
/// ]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct RawConfigFile {
    pub commands: Vec<RawCommandEntry>,
}

/// One entry of the command list.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCommandEntry {
    /// `"bash"` or `"nmc"`. Kept as a string here so an unknown value is
    /// reported as a configuration error with its position.
    #[serde(rename = "type")]
    pub kind: String,

    pub cmd: String,

    /// Entries without an `enabled` field are run.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Validated configuration: every entry has a known [`CommandKind`].
///
/// Construct via `ConfigFile::try_from(raw)` or the loader functions.
///
/// [`CommandKind`]: crate::types::CommandKind
#[derive(Debug, Clone)]
pub struct ConfigFile {
    commands: Vec<Command>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    /// All commands in file order, disabled ones included.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn enabled_count(&self) -> usize {
        self.commands.iter().filter(|c| c.enabled).count()
    }
}
