mod common;
use crate::common::builders::{test_settings, ConfigFileBuilder};
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use nix::sys::signal::kill;
use nix::unistd::Pid;

use paircheck::cli::CliArgs;
use paircheck::config::{load_and_validate, CheckSettings};
use paircheck::errors::CheckError;
use paircheck::exec::{ChannelDispatcher, ShellRunner};
use paircheck::plan::RunPlan;

type TestResult = Result<(), Box<dyn Error>>;

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

fn settings_in(dir: &Path) -> CheckSettings {
    CheckSettings {
        output_dir: dir.to_path_buf(),
        // `false isrunning` exits 1: no partner.
        failover_cli: "false".to_string(),
        local_only: false,
        ..test_settings("testhost")
    }
}

#[tokio::test]
async fn enabled_command_runs_and_disabled_one_does_not() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;

    let cfg = ConfigFileBuilder::new()
        .bash("echo A")
        .disabled_bash("echo B")
        .build();
    let plan = RunPlan::from_config(&cfg);
    let dispatcher = ChannelDispatcher::new(ShellRunner::new(), settings_in(tmp.path()));

    let report = with_timeout(paircheck::check(&dispatcher, &plan)).await?;

    let path = tmp.path().join("paircheck-testhost.txt");
    assert_eq!(fs::read_to_string(&path)?, "A\n\n");
    assert_eq!(report.hosts.len(), 1);
    assert_eq!(report.locations(), vec![&path]);

    Ok(())
}

#[tokio::test]
async fn failing_command_stops_the_rest_of_its_batch() -> TestResult {
    let tmp = tempfile::tempdir()?;

    let cfg = ConfigFileBuilder::new()
        .bash("echo A")
        .bash("false")
        .bash("echo C")
        .nmc("show version")
        .build();
    let plan = RunPlan::from_config(&cfg);
    let settings = CheckSettings {
        management_shell: "printf '%s|'".to_string(),
        ..settings_in(tmp.path())
    };
    let dispatcher = ChannelDispatcher::new(ShellRunner::new(), settings);

    with_timeout(paircheck::check(&dispatcher, &plan)).await?;

    // `echo C` never ran; what the batch printed before failing is kept,
    // and the next batch still runs.
    let written = fs::read_to_string(tmp.path().join("paircheck-testhost.txt"))?;
    assert_eq!(written, "A\n\n-c|show version|\n");

    Ok(())
}

#[tokio::test]
async fn management_batch_goes_through_management_shell() -> TestResult {
    let tmp = tempfile::tempdir()?;

    let cfg = ConfigFileBuilder::new()
        .nmc("show appliance")
        .bash("echo plain")
        .nmc("show volume")
        .build();
    let plan = RunPlan::from_config(&cfg);
    let settings = CheckSettings {
        management_shell: "printf '%s|'".to_string(),
        ..settings_in(tmp.path())
    };
    let dispatcher = ChannelDispatcher::new(ShellRunner::new(), settings);

    with_timeout(paircheck::check(&dispatcher, &plan)).await?;

    let written = fs::read_to_string(tmp.path().join("paircheck-testhost.txt"))?;
    assert_eq!(written, "-c|show appliance && show volume|\nplain\n\n");

    Ok(())
}

#[tokio::test]
async fn batch_timeout_aborts_run() -> TestResult {
    let tmp = tempfile::tempdir()?;

    let cfg = ConfigFileBuilder::new().bash("echo started; sleep 30").build();
    let plan = RunPlan::from_config(&cfg);
    let settings = CheckSettings {
        batch_timeout: Some(Duration::from_millis(300)),
        ..settings_in(tmp.path())
    };
    let dispatcher = ChannelDispatcher::new(ShellRunner::new(), settings);

    let err = with_timeout(paircheck::check(&dispatcher, &plan))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckError::TimedOut { .. }), "{err:?}");

    // The transcript was opened before anything ran, and stays empty.
    let written = fs::read_to_string(tmp.path().join("paircheck-testhost.txt"))?;
    assert_eq!(written, "");

    Ok(())
}

#[tokio::test]
async fn unknown_type_fails_before_anything_runs() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let marker = tmp.path().join("marker");
    let config = tmp.path().join("paircheck.json");
    fs::write(
        &config,
        format!(
            r#"[
                {{"type": "bash", "cmd": "touch {}"}},
                {{"type": "foo", "cmd": "echo never"}}
            ]"#,
            marker.display()
        ),
    )?;

    let err = load_and_validate(&config).unwrap_err();
    assert!(matches!(err, CheckError::Config(_)), "{err:?}");

    // Same through the top-level entry point.
    let args = CliArgs::try_parse_from([
        "paircheck",
        "--config",
        path_arg(&config),
        "--output-dir",
        path_arg(tmp.path()),
        "--hostname",
        "testhost",
        "--local-only",
    ])?;
    let err = paircheck::run(args).await.unwrap_err();
    assert!(matches!(err, CheckError::Config(_)), "{err:?}");

    assert!(!marker.exists());
    assert!(!tmp.path().join("paircheck-testhost.txt").exists());

    Ok(())
}

#[tokio::test]
async fn run_writes_transcript_from_config_file() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let config = tmp.path().join("cmds.json");
    fs::write(
        &config,
        r#"[
            {"type": "bash", "cmd": "echo one", "enabled": true},
            {"type": "bash", "cmd": "echo two", "enabled": false}
        ]"#,
    )?;
    let out = tmp.path().join("out");

    let args = CliArgs::try_parse_from([
        "paircheck",
        "--config",
        path_arg(&config),
        "--output-dir",
        path_arg(&out),
        "--prefix",
        "diag",
        "--hostname",
        "testhost",
        "--failover-cli",
        "false",
    ])?;
    with_timeout(paircheck::run(args)).await?;

    assert_eq!(fs::read_to_string(out.join("diag-testhost.txt"))?, "one\n\n");

    Ok(())
}

#[tokio::test]
async fn dry_run_executes_nothing() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let marker = tmp.path().join("marker");
    let config = tmp.path().join("paircheck.json");
    fs::write(
        &config,
        format!(r#"[{{"type": "bash", "cmd": "touch {}"}}]"#, marker.display()),
    )?;

    let args = CliArgs::try_parse_from([
        "paircheck",
        "--config",
        path_arg(&config),
        "--output-dir",
        path_arg(tmp.path()),
        "--hostname",
        "testhost",
        "--dry-run",
    ])?;
    paircheck::run(args).await?;

    assert!(!marker.exists());
    assert!(!tmp.path().join("paircheck-testhost.txt").exists());

    Ok(())
}

/// Alive and not a zombie.
fn is_running(pid: i32) -> bool {
    if kill(Pid::from_raw(pid), None).is_err() {
        return false;
    }
    match fs::read_to_string(format!("/proc/{pid}/stat")) {
        Ok(stat) => !matches!(stat.split_whitespace().nth(2), Some("Z") | Some("X")),
        Err(_) => false,
    }
}

async fn wait_until_gone(pid: i32) -> bool {
    for _ in 0..200 {
        if !is_running(pid) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

async fn read_pid_when_written(path: &Path) -> i32 {
    loop {
        if let Some(pid) = fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
        {
            return pid;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn interrupt_abandons_run_and_kills_running_batch() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let sh_pid = tmp.path().join("sh.pid");
    let bg_pid = tmp.path().join("bg.pid");

    let cfg = ConfigFileBuilder::new()
        .bash(&format!("echo $$ > {}", sh_pid.display()))
        .bash(&format!("sleep 30 & echo $! > {}", bg_pid.display()))
        .bash("wait")
        .bash("echo unreachable")
        .build();
    let plan = RunPlan::from_config(&cfg);
    let dispatcher = ChannelDispatcher::new(ShellRunner::new(), settings_in(tmp.path()));

    // Stands in for Ctrl-C: fires once the batch is running.
    let interrupt = async {
        read_pid_when_written(&bg_pid).await;
    };
    let err = with_timeout(paircheck::check_until(&dispatcher, &plan, interrupt))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckError::Interrupted), "{err:?}");

    let sh = read_pid_when_written(&sh_pid).await;
    let bg = read_pid_when_written(&bg_pid).await;
    assert!(wait_until_gone(sh).await, "batch shell still running");
    assert!(wait_until_gone(bg).await, "sleep started by the batch still running");

    let written = fs::read_to_string(tmp.path().join("paircheck-testhost.txt"))?;
    assert!(!written.contains("unreachable"));

    Ok(())
}

#[test]
fn shipped_demo_config_is_valid() -> TestResult {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/paircheck.json");
    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.enabled_count(), 5);

    let plan = RunPlan::from_config(&cfg);
    let kinds: Vec<_> = plan.batches().iter().map(|b| b.kind.to_string()).collect();
    assert_eq!(kinds, vec!["bash", "nmc"]);

    Ok(())
}
