// src/plan/batch.rs

use tracing::debug;

use crate::config::ConfigFile;
use crate::types::{Command, CommandKind};

/// Separator used to join the commands of a shell batch into a single
/// invocation.
pub const STATEMENT_SEPARATOR: &str = "; ";

/// Prepended to shell batches: the first failing statement ends the batch.
pub const ERREXIT_PRELUDE: &str = "set -e; ";

/// Separator for management-shell batches, which have no `set -e`.
pub const MANAGED_SEPARATOR: &str = " && ";

/// All enabled commands of one kind, in config order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub kind: CommandKind,
    pub commands: Vec<String>,
}

impl Batch {
    /// The batch as one command line.
    ///
    /// A failing command stops the rest of the batch; the batch then exits
    /// non-zero with whatever output it produced so far.
    pub fn script(&self) -> String {
        match self.kind {
            CommandKind::Shell => {
                format!("{ERREXIT_PRELUDE}{}", self.commands.join(STATEMENT_SEPARATOR))
            }
            CommandKind::ManagementShell => self.commands.join(MANAGED_SEPARATOR),
        }
    }
}

/// Command batches for one run, ordered by the first enabled appearance of
/// each kind in the config. Shared read-only by every host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunPlan {
    batches: Vec<Batch>,
}

impl RunPlan {
    pub fn from_commands<'a>(commands: impl IntoIterator<Item = &'a Command>) -> Self {
        let mut batches: Vec<Batch> = Vec::new();

        for command in commands {
            if !command.enabled {
                debug!(kind = %command.kind, cmd = %command.text, "skipping disabled command");
                continue;
            }
            match batches.iter_mut().find(|b| b.kind == command.kind) {
                Some(batch) => batch.commands.push(command.text.clone()),
                None => batches.push(Batch {
                    kind: command.kind,
                    commands: vec![command.text.clone()],
                }),
            }
        }

        Self { batches }
    }

    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self::from_commands(cfg.commands())
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn batch(&self, kind: CommandKind) -> Option<&Batch> {
        self.batches.iter().find(|b| b.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}
