//! Structured logging with environment variable configuration.
//!
//! The library only emits `tracing` events; binaries and test harnesses call
//! [`init_logging`] to see them. Output goes to stderr.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::RunnerConfig;

fn filter_from_config(config: &RunnerConfig) -> EnvFilter {
    EnvFilter::new(config.log_level.as_filter_str())
}

/// Initialise the logging subsystem based on configuration.
///
/// Log level precedence (highest to lowest):
///
/// 1. [`ConfigOverrides::log_level`](crate::ConfigOverrides::log_level)
/// 2. `STEPWISE_LOG_LEVEL`
/// 3. [`LogLevel::default`](crate::LogLevel::default)
///
/// If a global subscriber is already set the call does nothing, so repeated
/// initialisation from several tests is harmless.
pub fn init_logging(config: &RunnerConfig) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_from_config(config))
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .finish();

    // The first subscriber wins.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
