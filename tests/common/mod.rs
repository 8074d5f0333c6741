pub use paircheck_test_utils::builders;
pub use paircheck_test_utils::fake_runner;
pub use paircheck_test_utils::memory_sinks;
pub use paircheck_test_utils::init_tracing;
pub use paircheck_test_utils::with_timeout;
