// src/sink.rs

//! Per-host output destinations.
//!
//! The planner asks a [`SinkFactory`] for one writer per host. Production
//! uses [`FileSinks`]; tests can collect transcripts in memory instead.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::Result;

/// Writer for one host's transcript.
pub type Sink = Box<dyn Write + Send>;

pub trait SinkFactory {
    /// Open the transcript for `host`. Called once per host per run.
    fn open(&mut self, host: &str) -> Result<Sink>;

    /// Where `host`'s transcript ends up, if it is a file.
    fn location(&self, _host: &str) -> Option<PathBuf> {
        None
    }
}

/// Writes `<dir>/<prefix>-<host>.txt`, creating `dir` if needed.
///
/// Existing transcripts from an earlier run are truncated.
#[derive(Debug, Clone)]
pub struct FileSinks {
    dir: PathBuf,
    prefix: String,
}

impl FileSinks {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, host: &str) -> PathBuf {
        self.dir.join(format!("{}-{}.txt", self.prefix, host))
    }
}

impl SinkFactory for FileSinks {
    fn open(&mut self, host: &str) -> Result<Sink> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(host);
        let file = File::create(&path)?;
        debug!(host, path = %path.display(), "opened transcript");
        Ok(Box::new(BufWriter::new(file)))
    }

    fn location(&self, host: &str) -> Option<PathBuf> {
        Some(self.path_for(host))
    }
}
