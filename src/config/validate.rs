// src/config/validate.rs

use crate::config::model::{ConfigFile, RawCommandEntry, RawConfigFile};
use crate::errors::{CheckError, Result};
use crate::types::{Command, CommandKind};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = CheckError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let commands = raw
            .commands
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| validate_entry(idx, entry))
            .collect::<Result<Vec<_>>>()?;
        Ok(ConfigFile::new_unchecked(commands))
    }
}

fn validate_entry(idx: usize, entry: RawCommandEntry) -> Result<Command> {
    let kind: CommandKind = entry
        .kind
        .parse()
        .map_err(|e| CheckError::Config(format!("command #{idx}: {e}")))?;

    if entry.enabled && entry.cmd.trim().is_empty() {
        return Err(CheckError::Config(format!(
            "command #{idx} ({kind}) has an empty `cmd`"
        )));
    }

    Ok(Command {
        kind,
        text: entry.cmd,
        enabled: entry.enabled,
    })
}
