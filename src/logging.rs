//! Logging Setup
//!
//! Installs the global `tracing` subscriber: env-filtered, local-time
//! timestamps on stderr, optionally mirrored into a daily-rolling file.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;
use crate::helpers::is_development;

/// Log file prefix inside the configured directory
const LOG_FILE_PREFIX: &str = "solar-configurator.log";

/// Build the filter: `RUST_LOG` wins, otherwise the configured level
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    let fallback = if config.level.trim().is_empty() {
        if is_development() { "debug" } else { "info" }
    } else {
        config.level.as_str()
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialize tracing for the process
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the program.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_timer(LocalTime::rfc_3339())
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match &config.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_timer(LocalTime::rfc_3339())
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let result = tracing_subscriber::registry()
        .with(build_filter(config))
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    if let Err(e) = result {
        eprintln!("tracing already initialized: {e}");
    }

    guard
}
