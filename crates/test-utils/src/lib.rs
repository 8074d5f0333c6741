pub mod builders;
pub mod fake_runner;
pub mod memory_sinks;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Upper bound for tests that start real processes.
pub const TEST_DEADLINE: Duration = Duration::from_secs(15);

/// Await `f`, failing the test if it outlives [`TEST_DEADLINE`].
///
/// Keeps a hung child process from hanging the whole test binary.
pub async fn with_timeout<F: Future>(f: F) -> F::Output {
    match tokio::time::timeout(TEST_DEADLINE, f).await {
        Ok(out) => out,
        Err(_) => panic!("test did not finish within {TEST_DEADLINE:?}"),
    }
}
