//! Diagnostic logging.
//!
//! Logs go to stderr so stdout stays a clean JSON channel. `RUST_LOG`
//! overrides the configured level.

use tracing_subscriber::EnvFilter;

use crate::models::config::LoggingConfig;

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

/// Logging for tests: captured by the test harness.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
