use std::fmt;
use std::str::FromStr;

/// Which shell a configured command is written for.
///
/// - `Shell` (`"bash"`): a plain POSIX shell statement.
/// - `ManagementShell` (`"nmc"`): a statement for the cluster management
///   shell, which is invoked with the statement as its `-c` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Shell,
    ManagementShell,
}

impl CommandKind {
    /// The name used for this kind in the config file.
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Shell => "bash",
            CommandKind::ManagementShell => "nmc",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bash" => Ok(CommandKind::Shell),
            "nmc" => Ok(CommandKind::ManagementShell),
            other => Err(format!(
                "unknown command type: {other:?} (expected \"bash\" or \"nmc\")"
            )),
        }
    }
}

/// A single configured diagnostic command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub text: String,
    pub enabled: bool,
}

impl Command {
    pub fn new(kind: CommandKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// The hosts a run covers: always the local node, plus its cluster partner
/// when one was discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSet {
    pub this_node: String,
    pub that_node: Option<String>,
}

impl HostSet {
    pub fn new(this_node: impl Into<String>, that_node: Option<String>) -> Self {
        Self {
            this_node: this_node.into(),
            that_node,
        }
    }

    pub fn local_only(this_node: impl Into<String>) -> Self {
        Self::new(this_node, None)
    }

    /// Hosts in run order: `this_node` first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.this_node.as_str()).chain(self.that_node.as_deref())
    }

    pub fn is_local(&self, host: &str) -> bool {
        host == self.this_node
    }

    pub fn len(&self) -> usize {
        1 + usize::from(self.that_node.is_some())
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
