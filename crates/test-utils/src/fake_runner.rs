use std::sync::{Arc, Mutex};
use std::time::Duration;

use paircheck::errors::CheckError;
use paircheck::exec::{CommandRunner, ExecutionResult, RunFuture};

/// What the fake should do for a matching command line.
#[derive(Debug, Clone)]
pub enum FakeOutcome {
    Output(String),
    NonZero { code: i32, output: String },
    TimedOut,
    SpawnFailure,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeCall {
    pub command: String,
    pub timeout: Option<Duration>,
}

/// A fake runner that:
/// - records every command line it was asked to run
/// - answers with the first rule whose needle occurs in the command line
/// - otherwise echoes the command line back as successful output.
#[derive(Clone, Default)]
pub struct FakeRunner {
    rules: Vec<(String, FakeOutcome)>,
    calls: Arc<Mutex<Vec<FakeCall>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, needle: &str, outcome: FakeOutcome) -> Self {
        self.rules.push((needle.to_string(), outcome));
        self
    }

    pub fn output(self, needle: &str, text: &str) -> Self {
        self.respond(needle, FakeOutcome::Output(text.to_string()))
    }

    pub fn non_zero(self, needle: &str, code: i32, output: &str) -> Self {
        self.respond(
            needle,
            FakeOutcome::NonZero {
                code,
                output: output.to_string(),
            },
        )
    }

    /// Shared handle to the call log; stays valid after the runner is moved.
    pub fn call_log(&self) -> Arc<Mutex<Vec<FakeCall>>> {
        Arc::clone(&self.calls)
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.command.clone())
            .collect()
    }

    fn answer(&self, command: &str) -> paircheck::errors::Result<ExecutionResult> {
        let outcome = self
            .rules
            .iter()
            .find(|(needle, _)| command.contains(needle.as_str()))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or_else(|| FakeOutcome::Output(command.to_string()));

        match outcome {
            FakeOutcome::Output(text) => Ok(ExecutionResult { text, exit_code: 0 }),
            FakeOutcome::NonZero { code, output } => Err(CheckError::NonZeroExit {
                command: command.to_string(),
                code,
                output,
            }),
            FakeOutcome::TimedOut => Err(CheckError::TimedOut {
                command: command.to_string(),
                timeout: Duration::from_secs(1),
            }),
            FakeOutcome::SpawnFailure => Err(CheckError::Spawn {
                command: command.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "fake spawn failure"),
            }),
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(&'a self, command: &'a str, timeout: Option<Duration>) -> RunFuture<'a> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(FakeCall {
                command: command.to_string(),
                timeout,
            });
            self.answer(command)
        })
    }
}
