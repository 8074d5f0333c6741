#![allow(dead_code)]

use paircheck::config::{ConfigFile, RawCommandEntry, RawConfigFile};
use paircheck::config::CheckSettings;
use paircheck::errors::Result;

/// Builder for `ConfigFile` to simplify test setup.
///
/// Entries go through the same validation as a file on disk, so an unknown
/// `type` can be exercised with [`ConfigFileBuilder::entry`].
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile { commands: vec![] },
        }
    }

    pub fn entry(mut self, kind: &str, cmd: &str, enabled: bool) -> Self {
        self.config.commands.push(RawCommandEntry {
            kind: kind.to_string(),
            cmd: cmd.to_string(),
            enabled,
        });
        self
    }

    pub fn bash(self, cmd: &str) -> Self {
        self.entry("bash", cmd, true)
    }

    pub fn nmc(self, cmd: &str) -> Self {
        self.entry("nmc", cmd, true)
    }

    pub fn disabled_bash(self, cmd: &str) -> Self {
        self.entry("bash", cmd, false)
    }

    pub fn disabled_nmc(self, cmd: &str) -> Self {
        self.entry("nmc", cmd, false)
    }

    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings for tests: fixed hostname, no partner lookup unless asked for.
pub fn test_settings(hostname: &str) -> CheckSettings {
    CheckSettings {
        hostname: Some(hostname.to_string()),
        local_only: true,
        ..CheckSettings::default()
    }
}
