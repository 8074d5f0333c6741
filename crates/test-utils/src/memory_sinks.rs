use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use paircheck::errors::{CheckError, Result};
use paircheck::sink::{Sink, SinkFactory};

type Buffers = Arc<Mutex<BTreeMap<String, Vec<u8>>>>;

/// Sink factory that keeps every host's transcript in memory.
///
/// Also counts opened and released writers so tests can check that sinks
/// are released on every exit path.
#[derive(Clone, Default)]
pub struct MemorySinks {
    buffers: Buffers,
    opened: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    fail_open_for: Option<String>,
}

impl MemorySinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `open` fail for `host`.
    pub fn failing_open_for(mut self, host: &str) -> Self {
        self.fail_open_for = Some(host.to_string());
        self
    }

    pub fn contents(&self, host: &str) -> Option<String> {
        self.buffers
            .lock()
            .unwrap()
            .get(host)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    pub fn hosts(&self) -> Vec<String> {
        self.buffers.lock().unwrap().keys().cloned().collect()
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl SinkFactory for MemorySinks {
    fn open(&mut self, host: &str) -> Result<Sink> {
        if self.fail_open_for.as_deref() == Some(host) {
            return Err(CheckError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("cannot open transcript for {host}"),
            )));
        }

        self.buffers
            .lock()
            .unwrap()
            .insert(host.to_string(), Vec::new());
        self.opened.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MemoryWriter {
            host: host.to_string(),
            buffers: Arc::clone(&self.buffers),
            released: Arc::clone(&self.released),
        }))
    }
}

struct MemoryWriter {
    host: String,
    buffers: Buffers,
    released: Arc<AtomicUsize>,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffers
            .lock()
            .unwrap()
            .entry(self.host.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MemoryWriter {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
