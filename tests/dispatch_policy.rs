mod common;
use crate::common::builders::test_settings;
use crate::common::fake_runner::{FakeOutcome, FakeRunner};
use crate::common::init_tracing;

use std::error::Error;
use std::time::Duration;

use paircheck::config::CheckSettings;
use paircheck::errors::CheckError;
use paircheck::exec::{Channel, ChannelDispatcher};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn non_zero_exit_is_logged_and_output_kept() -> TestResult {
    init_tracing();

    let runner = FakeRunner::new().non_zero("zpool", 2, "pool tank is DEGRADED\n");
    let dispatcher = ChannelDispatcher::new(runner, test_settings("nodeA"));

    let text = dispatcher
        .dispatch(&Channel::LocalPlain, "zpool status -x")
        .await?;
    assert_eq!(text, "pool tank is DEGRADED\n");

    Ok(())
}

#[tokio::test]
async fn timeout_propagates_as_fatal() -> TestResult {
    init_tracing();

    let runner = FakeRunner::new().respond("sleep", FakeOutcome::TimedOut);
    let dispatcher = ChannelDispatcher::new(runner, test_settings("nodeA"));

    let err = dispatcher
        .dispatch(&Channel::RemotePlain { host: "nodeB" }, "sleep 999")
        .await
        .unwrap_err();
    assert!(matches!(err, CheckError::TimedOut { .. }), "{err:?}");
    assert!(!err.is_recoverable());

    Ok(())
}

#[tokio::test]
async fn spawn_failure_propagates_as_fatal() -> TestResult {
    init_tracing();

    let runner = FakeRunner::new().respond("nmc", FakeOutcome::SpawnFailure);
    let dispatcher = ChannelDispatcher::new(runner, test_settings("nodeA"));

    let err = dispatcher
        .dispatch(&Channel::LocalManaged, "show appliance")
        .await
        .unwrap_err();
    assert!(matches!(err, CheckError::Spawn { .. }), "{err:?}");

    Ok(())
}

#[tokio::test]
async fn batches_run_without_deadline_by_default() -> TestResult {
    let dispatcher = ChannelDispatcher::new(FakeRunner::new(), test_settings("nodeA"));
    dispatcher.dispatch(&Channel::LocalPlain, "uptime").await?;

    let log = dispatcher.runner().call_log();
    let calls = log.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].timeout, None);

    Ok(())
}

#[tokio::test]
async fn configured_batch_timeout_is_passed_to_runner() -> TestResult {
    let settings = CheckSettings {
        batch_timeout: Some(Duration::from_secs(45)),
        ..test_settings("nodeA")
    };
    let dispatcher = ChannelDispatcher::new(FakeRunner::new(), settings);
    dispatcher.dispatch(&Channel::LocalPlain, "uptime").await?;

    let log = dispatcher.runner().call_log();
    assert_eq!(log.lock().unwrap()[0].timeout, Some(Duration::from_secs(45)));

    Ok(())
}

#[tokio::test]
async fn runner_sees_wrapped_command_line() -> TestResult {
    let dispatcher = ChannelDispatcher::new(FakeRunner::new(), test_settings("nodeA"));

    let text = dispatcher
        .dispatch(&Channel::RemoteManaged { host: "nodeB" }, "show volume")
        .await?;

    // The fake echoes the command line back.
    assert_eq!(
        text,
        r#"ssh -tt nodeB 'export COLUMNS=200; nmc -c '\''show volume'\'''"#
    );
    assert_eq!(dispatcher.runner().commands(), vec![text]);

    Ok(())
}
